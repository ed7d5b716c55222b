//! Server core functionality
//!
//! HTTP router, handlers and the listener lifecycle.

pub mod core;
pub mod routes;

pub use self::core::{Server, router};
pub use routes::{LoginRequest, LoginResponse};
