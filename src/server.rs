//! HTTP API exposing the probe.
//!
//! Provides:
//! - `/` - run one probe and return per-endpoint summaries

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::error::{AppError, Result};
use crate::executor::ProbeRunner;
use crate::logging::Logger;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Runner invoked once per request to `/`.
    pub runner: Arc<ProbeRunner>,
    /// Logger for request-level events.
    pub logger: Logger,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": self.category(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// Create the HTTP router.
pub fn create_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(probe_handler))
        .with_state(Arc::new(state))
}

/// Handler for `/` - runs a full probe.
///
/// Returns 200 with the report, or 500 if any request failed at the transport level.
async fn probe_handler(State(state): State<Arc<HttpState>>) -> Response {
    match state.runner.run().await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            state.logger.error(&format!("GET / failed: {}", e))
                .error_info(&e)
                .log()
                .await;
            e.into_response()
        }
    }
}

/// Bind the listener for the configured address.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::io(format!("Failed to bind {}: {}", addr, e)))
}

/// Serve `router` on `listener` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, router: Router, logger: &Logger, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;

    logger.info(&format!("Starting HTTP server on http://{}", addr))
        .field("bind", addr.to_string())
        .log()
        .await;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::io(format!("HTTP server error: {}", e)))?;

    logger.info("HTTP server stopped").log().await;
    Ok(())
}

/// Resolves on ctrl-c
pub async fn shutdown_signal() {
    // If the handler cannot be installed, run until the process is killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
