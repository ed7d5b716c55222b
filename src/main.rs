//! RAX Auth Server - Entry Point
//!
//! A minimal credential verification service: one login endpoint backed by a
//! pooled SQLite account store with Argon2id-hashed credentials.

use clap::Parser;
use log::{error, info};
use rax_auth_server::cli::{self, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG overrides the default filter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Launching auth server...");

    match cli::run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}
