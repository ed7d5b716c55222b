//! Error types
//!
//! Defines domain-specific error types for each module of the auth server.

use std::io;
use thiserror::Error;

/// Account store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("store did not answer within {0} ms")]
    Timeout(u64),

    #[error("malformed stored record for {identifier}: {reason}")]
    MalformedRecord { identifier: String, reason: String },

    #[error("identifier already exists: {0}")]
    DuplicateIdentifier(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("blocking task failed: {0}")]
    Task(String),
}

/// Credential verification errors.
///
/// Together with a successful verification these are the four outcomes a
/// caller can branch on. `Rejected` never says which half of the pair was wrong.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid credentials")]
    Rejected,

    #[error("system error: {0}")]
    System(#[from] StoreError),

    #[error("hashing failed: {0}")]
    Hashing(String),

    #[error("verification did not finish within {0} ms")]
    TimedOut(u64),
}

impl AuthError {
    /// True for failures on our side rather than the caller's
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            AuthError::System(_) | AuthError::Hashing(_) | AuthError::TimedOut(_)
        )
    }
}

/// Startup and provisioning errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
