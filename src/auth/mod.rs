//! Authentication system
//!
//! Credential hashing, the stateless credential verifier and its result types.

pub mod credentials;
pub mod results;
pub mod validator;

pub use credentials::CredentialHasher;
pub use results::{Outcome, VerifiedAccount};
pub use validator::{Verifier, validate_request};
