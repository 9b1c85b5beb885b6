//! Axum server setup
//!
//! Server skeleton with:
//! - All routes nested under `/api/v1`
//! - Request context + tracing middleware (off in test mode)
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::middleware::{normalize_path, request_context, RequestContext};
use super::routes;
use crate::db::TodoRepository;

/// Fixed prefix for every route
pub const API_PREFIX: &str = "/api/v1";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TodoRepository>,
    /// Test mode disables request middleware
    pub test_mode: bool,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>, test_mode: bool) -> Self {
        Self { repo, test_mode }
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::health::router())
        .merge(routes::todos::router());

    let app = Router::new().nest(API_PREFIX, api);

    let app = if state.test_mode {
        app
    } else {
        app.layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let transaction_id = request
                    .extensions()
                    .get::<RequestContext>()
                    .map(|ctx| ctx.transaction_id.to_string())
                    .unwrap_or_default();
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    endpoint = %normalize_path(request.uri().path()),
                    transaction_id = %transaction_id
                )
            }),
        )
        .layer(axum::middleware::from_fn(request_context))
    };

    app.with_state(Arc::new(state))
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let repo = Arc::new(PgTodoRepo::new(pool));
/// run_server(AppState::new(repo, false), config.bind_addr).await?;
/// ```
pub async fn run_server(state: AppState, bind_addr: SocketAddr) -> Result<(), ServerError> {
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
