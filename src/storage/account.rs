//! Account record and store abstraction

use crate::error::StoreError;

/// A stored account as read from the `accounts` table.
///
/// `credential_hash` is a PHC string: it carries the algorithm, work factor and
/// salt next to the derived hash. The plaintext secret is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub identifier: String,
    pub credential_hash: String,
}

/// Persistent account lookup.
///
/// Implementations are blocking; callers run them on the blocking pool and
/// bound them with a timeout. Each call acquires whatever connection it needs
/// and releases it before returning.
pub trait AccountStore: Send + Sync + 'static {
    /// Exact, case-sensitive lookup. `Ok(None)` when the identifier is unknown.
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<AccountRecord>, StoreError>;

    /// Out-of-band provisioning. Never called on the verification path.
    fn insert_account(&self, record: &AccountRecord) -> Result<(), StoreError>;
}
