//! Command line entry points
//!
//! `serve` runs the HTTP server; `add-account` provisions an account out of band.

use crate::auth::{CredentialHasher, Verifier, validate_request};
use crate::config::{AppConfig, InputLimits};
use crate::error::ServerError;
use crate::server::Server;
use crate::storage::{AccountRecord, AccountStore, SqliteAccountStore};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable consulted for the secret of `add-account`
pub const SECRET_ENV: &str = "RAX_AUTH_SECRET";

#[derive(Debug, Parser)]
#[command(name = "rax-auth-server", version, about = "Minimal credential verification service")]
pub struct Cli {
    /// Path to a TOML config file (default: search for config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Create an account. The secret is read from RAX_AUTH_SECRET or stdin.
    AddAccount {
        /// Case-sensitive account identifier
        identifier: String,
    },
}

pub async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::AddAccount { identifier } => {
            let secret = read_secret()?;
            let store = SqliteAccountStore::open(&config.store)?;
            let hasher = CredentialHasher::new(&config.hashing)?;
            provision_account(&store, &hasher, &config.limits, &identifier, &secret)?;
            info!("Account {:?} created", identifier);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), ServerError> {
    // Without a store there is nothing to serve
    let store = Arc::new(SqliteAccountStore::open(&config.store)?);
    let hasher = CredentialHasher::new(&config.hashing)?;
    let verifier = Arc::new(
        Verifier::new(store, hasher, config.limits.clone(), config.store.query_timeout_ms)
            .with_request_timeout_ms(config.server.request_timeout_ms()),
    );

    let server = Server::bind(&config.server, verifier).await?;
    server.start().await
}

/// Hash `secret` and store it under `identifier`.
pub fn provision_account<S: AccountStore>(
    store: &S,
    hasher: &CredentialHasher,
    limits: &InputLimits,
    identifier: &str,
    secret: &str,
) -> Result<AccountRecord, ServerError> {
    validate_request(identifier, secret, limits).map_err(|e| match e {
        crate::error::AuthError::InvalidRequest(reason) => ServerError::InvalidInput(reason),
        other => ServerError::Auth(other),
    })?;

    let record = AccountRecord {
        identifier: identifier.to_string(),
        credential_hash: hasher.hash_secret(secret)?,
    };
    store.insert_account(&record)?;
    Ok(record)
}

fn read_secret() -> Result<String, ServerError> {
    if let Ok(secret) = std::env::var(SECRET_ENV) {
        return Ok(secret);
    }

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
