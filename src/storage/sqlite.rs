//! SQLite-backed account store.
//!
//! Tables:
//! - `accounts`: identifier, credential_hash, created_at
//!
//! Every operation checks a connection out of the pool for the duration of a
//! single statement. `PooledConnection` returns it on drop, so error paths
//! release it too.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::storage::account::{AccountRecord, AccountStore};
use log::{debug, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};
use std::time::{SystemTime, UNIX_EPOCH};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS accounts (
    identifier TEXT PRIMARY KEY NOT NULL,
    credential_hash TEXT NOT NULL,
    created_at INTEGER NOT NULL
);";

const SELECT_ACCOUNT: &str =
    "SELECT identifier, credential_hash FROM accounts WHERE identifier = ?1";

const INSERT_ACCOUNT: &str =
    "INSERT INTO accounts (identifier, credential_hash, created_at) VALUES (?1, ?2, ?3)";

/// Account store over a pool of SQLite connections
pub struct SqliteAccountStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAccountStore {
    /// Open (or create) the account database and its schema.
    ///
    /// Fails if no connection can be established within the acquire timeout;
    /// callers treat that as fatal at startup.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.database_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let busy_timeout = config.busy_timeout();
        let manager = SqliteConnectionManager::file(&path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            // WAL mode for concurrent reads
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;",
            )
        });

        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(config.acquire_timeout())
            .build(manager)?;

        pool.get()?.execute_batch(SCHEMA)?;

        info!(
            "Account store ready at {} (pool size {})",
            path.display(),
            config.max_connections
        );

        Ok(Self { pool })
    }

    /// Connections currently checked out of the pool
    pub fn connections_in_use(&self) -> u32 {
        let state = self.pool.state();
        state.connections - state.idle_connections
    }
}

impl AccountStore for SqliteAccountStore {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<AccountRecord>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare_cached(SELECT_ACCOUNT)?;
        let record = stmt
            .query_row(params![identifier], |row| {
                Ok(AccountRecord {
                    identifier: row.get(0)?,
                    credential_hash: row.get(1)?,
                })
            })
            .optional()?;
        Ok(record)
    }

    fn insert_account(&self, record: &AccountRecord) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        let result = conn.execute(
            INSERT_ACCOUNT,
            params![record.identifier, record.credential_hash, epoch_secs()],
        );

        match result {
            Ok(_) => {
                debug!("Inserted account {}", record.identifier);
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateIdentifier(record.identifier.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Current Unix epoch in seconds
fn epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
