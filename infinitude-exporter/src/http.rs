//! HTTP server for the Prometheus metrics and health endpoints.

use std::net::SocketAddr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::collector::SharedRegistry;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    registry: SharedRegistry,
}

/// Body of the `/health` response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Create the HTTP router.
fn create_router(registry: SharedRegistry, metrics_path: &str) -> Router {
    let state = AppState { registry };

    Router::new()
        .route(metrics_path, get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for the /metrics endpoint.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    let body = state.registry.render().await;

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Handler for the /health endpoint.
///
/// Never touches the upstream controller.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// HTTP server configuration.
pub struct HttpServer {
    registry: SharedRegistry,
    listen_addr: SocketAddr,
    metrics_path: String,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(registry: SharedRegistry, listen_addr: SocketAddr, metrics_path: String) -> Self {
        Self {
            registry,
            listen_addr,
            metrics_path,
        }
    }

    /// Run the HTTP server until the shutdown signal is received.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.listen_addr, e))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener until the shutdown signal is
    /// received.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let router = create_router(self.registry, &self.metrics_path);
        let addr = listener.local_addr().unwrap_or(self.listen_addr);

        info!(
            addr = %addr,
            path = %self.metrics_path,
            "HTTP server listening"
        );

        // Run server with graceful shutdown
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                // Wait for shutdown signal
                loop {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                    if *shutdown.borrow() {
                        break;
                    }
                }
                info!("HTTP server shutting down");
            })
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

        info!("HTTP server stopped");
        Ok(())
    }
}
