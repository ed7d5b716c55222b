//! Error handlers
//!
//! Maps verification errors onto HTTP status codes and the generic messages
//! clients get to see, and logs the internal detail.

use crate::error::types::AuthError;
use axum::http::StatusCode;
use log::{debug, error};

pub const MSG_AUTHENTICATED: &str = "Login successful.";
pub const MSG_INVALID_REQUEST: &str = "Username and password are required.";
pub const MSG_REJECTED: &str = "Invalid username or password.";
pub const MSG_SYSTEM_ERROR: &str = "Internal server error.";

/// Log an auth error with as much detail as is safe to keep server-side
pub fn handle_error(err: &AuthError) {
    match err {
        err if err.is_system() => error!("Credential check failed: {}", err),
        AuthError::InvalidRequest(reason) => debug!("Malformed login request: {}", reason),
        _ => debug!("Login rejected"),
    }
}

/// Convert error to HTTP status code
pub fn error_to_status(err: &AuthError) -> StatusCode {
    match err {
        err if err.is_system() => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNAUTHORIZED,
    }
}

/// Message safe to put in a response body. Never carries internal detail.
pub fn public_message(err: &AuthError) -> &'static str {
    match err {
        err if err.is_system() => MSG_SYSTEM_ERROR,
        AuthError::InvalidRequest(_) => MSG_INVALID_REQUEST,
        _ => MSG_REJECTED,
    }
}
