//! Credential verifier
//!
//! Checks an (identifier, secret) pair against the account store. Unknown
//! identifiers and wrong secrets produce the same `Rejected` error after the
//! same amount of hashing work.

use crate::auth::credentials::CredentialHasher;
use crate::auth::results::VerifiedAccount;
use crate::config::InputLimits;
use crate::error::{AuthError, StoreError};
use crate::storage::{AccountRecord, AccountStore};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Bound on a whole verification unless overridden
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Stateless verifier shared by all requests
pub struct Verifier<S: AccountStore> {
    store: Arc<S>,
    hasher: Arc<CredentialHasher>,
    limits: InputLimits,
    query_timeout_ms: u64,
    request_timeout_ms: u64,
}

impl<S: AccountStore> Verifier<S> {
    pub fn new(
        store: Arc<S>,
        hasher: CredentialHasher,
        limits: InputLimits,
        query_timeout_ms: u64,
    ) -> Self {
        Self {
            store,
            hasher: Arc::new(hasher),
            limits,
            query_timeout_ms,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    /// Bound lookup plus hashing together.
    pub fn with_request_timeout_ms(mut self, request_timeout_ms: u64) -> Self {
        self.request_timeout_ms = request_timeout_ms;
        self
    }

    /// Verify a credential pair.
    ///
    /// Malformed input is refused before the store is touched. Store failures
    /// and unreadable stored hashes surface as `AuthError::System`; running
    /// past the request deadline surfaces as `AuthError::TimedOut`.
    pub async fn verify(&self, identifier: &str, secret: &str) -> Result<VerifiedAccount, AuthError> {
        validate_request(identifier, secret, &self.limits)?;

        let deadline = Duration::from_millis(self.request_timeout_ms);
        match tokio::time::timeout(deadline, self.check(identifier, secret)).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::TimedOut(self.request_timeout_ms)),
        }
    }

    async fn check(&self, identifier: &str, secret: &str) -> Result<VerifiedAccount, AuthError> {
        let record = self.lookup(identifier).await?;
        if record.is_none() {
            debug!("No account for identifier {:?}", identifier);
        }

        let hasher = Arc::clone(&self.hasher);
        let supplied = secret.to_owned();
        let matched = tokio::task::spawn_blocking(move || match record {
            Some(record) => hasher.matches(&record.identifier, &supplied, &record.credential_hash),
            None => {
                hasher.burn(&supplied);
                Ok(false)
            }
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;

        if matched {
            debug!("Identifier {:?} authenticated", identifier);
            Ok(VerifiedAccount {
                identifier: identifier.to_string(),
            })
        } else {
            Err(AuthError::Rejected)
        }
    }

    /// Single bounded store read. The connection is acquired and released
    /// inside the blocking task.
    async fn lookup(&self, identifier: &str) -> Result<Option<AccountRecord>, StoreError> {
        let store = Arc::clone(&self.store);
        let key = identifier.to_owned();
        let task = tokio::task::spawn_blocking(move || store.find_by_identifier(&key));

        match tokio::time::timeout(Duration::from_millis(self.query_timeout_ms), task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(StoreError::Task(join_err.to_string())),
            Err(_) => Err(StoreError::Timeout(self.query_timeout_ms)),
        }
    }
}

/// Both fields must be non-empty, NUL-free and within the configured lengths.
pub fn validate_request(identifier: &str, secret: &str, limits: &InputLimits) -> Result<(), AuthError> {
    if identifier.is_empty() || secret.is_empty() {
        return Err(AuthError::InvalidRequest("identifier and secret are required".into()));
    }

    if identifier.len() > limits.max_identifier_length {
        return Err(AuthError::InvalidRequest("identifier too long".into()));
    }

    if secret.len() > limits.max_secret_length {
        return Err(AuthError::InvalidRequest("secret too long".into()));
    }

    if identifier.contains('\0') || secret.contains('\0') {
        return Err(AuthError::InvalidRequest("NUL byte in input".into()));
    }

    Ok(())
}
