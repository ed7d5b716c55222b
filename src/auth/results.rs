//! Authentication result types
//!
//! Defines result structures returned by credential verification.

use crate::error::AuthError;

/// Successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccount {
    pub identifier: String,
}

/// Flat view of a verification result for callers that only branch on kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Authenticated,
    Rejected,
    InvalidRequest,
    SystemError,
}

impl Outcome {
    pub fn from_result(result: &Result<VerifiedAccount, AuthError>) -> Self {
        match result {
            Ok(_) => Outcome::Authenticated,
            Err(err) if err.is_system() => Outcome::SystemError,
            Err(AuthError::InvalidRequest(_)) => Outcome::InvalidRequest,
            Err(_) => Outcome::Rejected,
        }
    }
}
