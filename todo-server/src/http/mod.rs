//! HTTP server layer
//!
//! Axum server with:
//! - Request context middleware (transaction id, normalized endpoint logging)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use middleware::{normalize_path, RequestContext, TRANSACTION_ID_HEADER};
pub use server::{build_router, run_server, AppState, ServerError, API_PREFIX};
