//! Account storage
//!
//! The verifier only sees the [`AccountStore`] trait; the SQLite
//! implementation sits behind an r2d2 connection pool.

pub mod account;
pub mod sqlite;

pub use account::{AccountRecord, AccountStore};
pub use sqlite::SqliteAccountStore;
