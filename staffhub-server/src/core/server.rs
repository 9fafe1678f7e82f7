//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::core::{Config, Result, ServerState};
use crate::services::https::build_app;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(self) -> Result<()> {
        let Self { config, state } = self;
        let background = state.start_background_tasks();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, environment = %config.environment, "StaffHub server listening");

        let app = build_app(state);
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        background.shutdown().await;
        served?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
