/// HTTP server setup using `axum`.
///
/// Provides `AppContext` (shared state) and `Server` (startup logic).
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::pipeline::{AnswerSynthesizer, HistoryWindow};

/// Shared application context available to all request handlers.
///
/// Immutable after startup, so concurrent requests share nothing mutable.
#[derive(Clone)]
pub struct AppContext {
    pub synthesizer: Arc<AnswerSynthesizer>,
    pub history_window: HistoryWindow,
}

/// HTTP server wrapping the context.
pub struct Server {
    pub ctx: AppContext,
}

impl Server {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Bind `addr` and serve until Ctrl-C.
    pub async fn start(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, routes::router(self.ctx))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server encountered an error")?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
