use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::auth::Verifier;
use crate::config::HttpConfig;
use crate::error::ServerError;
use crate::middleware::logging::log_request;
use crate::server::routes::{handle_health, handle_login};
use crate::storage::AccountStore;

/// Build the application router around a shared verifier.
pub fn router<S: AccountStore>(verifier: Arc<Verifier<S>>, config: &HttpConfig) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/login", post(handle_login::<S>))
        .with_state(verifier)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(axum::middleware::from_fn(log_request))
}

pub struct Server {
    listener: TcpListener,
    app: Router,
}

impl Server {
    /// Bind the listener. Failure here is a startup failure.
    pub async fn bind<S: AccountStore>(
        config: &HttpConfig,
        verifier: Arc<Verifier<S>>,
    ) -> Result<Self, ServerError> {
        let addr = config.socket_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                return Err(e.into());
            }
        };

        Ok(Self {
            listener,
            app: router(verifier, config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl-C. Per-request failures never end this loop.
    pub async fn start(self) -> Result<(), ServerError> {
        info!("Starting RAX auth server on {}", self.local_addr()?);

        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
