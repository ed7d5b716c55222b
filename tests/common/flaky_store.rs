//! In-memory account store with injectable faults

use rax_auth_server::error::StoreError;
use rax_auth_server::storage::{AccountRecord, AccountStore};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Store that can be "unplugged" to simulate a lost database connection
#[derive(Default)]
pub struct FlakyStore {
    accounts: Mutex<HashMap<String, String>>,
    disconnected: AtomicBool,
    lookups: AtomicUsize,
    delay_ms: AtomicU64,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.disconnected.store(false, Ordering::SeqCst);
    }

    /// Make every lookup stall for `ms` before answering
    pub fn set_delay(&self, ms: u64) {
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Number of lookups that reached the store
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl AccountStore for FlakyStore {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<AccountRecord>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection reset by peer".into()));
        }

        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(identifier).map(|hash| AccountRecord {
            identifier: identifier.to_string(),
            credential_hash: hash.clone(),
        }))
    }

    fn insert_account(&self, record: &AccountRecord) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&record.identifier) {
            return Err(StoreError::DuplicateIdentifier(record.identifier.clone()));
        }
        accounts.insert(record.identifier.clone(), record.credential_hash.clone());
        Ok(())
    }
}
