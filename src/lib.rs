pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod middleware;
pub mod server;
pub mod storage;

pub use auth::Verifier;
pub use server::Server;
