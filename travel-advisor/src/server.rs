//! The SSE HTTP API.
//!
//! Routing, session endpoints and SSE encoding come from `adk_server`; this
//! module only wires the travel advisor agent and session store into it.

use crate::error::Result;
use adk_core::{Agent, SingleAgentLoader};
use adk_server::{ServerConfig, create_app};
use adk_session::SessionService;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// CORS origins. Empty allows any origin.
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    /// Include error details in HTTP error responses.
    pub expose_error_details: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            request_timeout: Duration::from_secs(120),
            expose_error_details: false,
        }
    }
}

/// Builds the API router: `/api/health`, `/api/sessions` and
/// `/api/run/{app}/{user}/{session}` among the framework's routes.
pub fn build_router(
    agent: Arc<dyn Agent>,
    sessions: Arc<dyn SessionService>,
    options: ServerOptions,
) -> Router {
    let loader = Arc::new(SingleAgentLoader::new(agent));
    let config = ServerConfig::new(loader, sessions)
        .with_allowed_origins(options.allowed_origins)
        .with_request_timeout(options.request_timeout)
        .with_error_details(options.expose_error_details);
    create_app(config)
}

/// Serves `router` on `0.0.0.0:port` until Ctrl-C.
pub async fn serve(router: Router, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "travel advisor API listening");

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
