//! Request context middleware
//!
//! Each request gets a UUID transaction id, returned in the
//! `x-transaction-id` header and stored in the request extensions as a
//! [`RequestContext`] that handlers receive explicitly. Endpoints are logged
//! with numeric segments replaced by `{id}` so `/todo/7` and `/todo/42`
//! aggregate under one key. Non-GET requests also log both bodies.

use std::convert::Infallible;
use std::time::Instant;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{FromRequestParts, OriginalUri, Request};
use axum::http::header::HeaderName;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use super::error::ApiError;

/// Response header carrying the transaction id
pub const TRANSACTION_ID_HEADER: HeaderName = HeaderName::from_static("x-transaction-id");

/// Replacement for numeric path segments in logged endpoints
pub const ID_PLACEHOLDER: &str = "{id}";

/// Largest request body buffered for logging
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Longest body excerpt written to a log line
const MAX_LOGGED_CHARS: usize = 4096;

/// Per-request values threaded through handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub transaction_id: Uuid,
    pub method: Method,
    /// Request path with numeric segments normalized
    pub endpoint: String,
}

impl RequestContext {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            method,
            endpoint: normalize_path(path),
        }
    }
}

/// Handlers always get a context; without the middleware a fresh one is built.
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }
        let path = match parts.extensions.get::<OriginalUri>() {
            Some(OriginalUri(uri)) => uri.path().to_owned(),
            None => parts.uri.path().to_owned(),
        };
        Ok(Self::new(parts.method.clone(), &path))
    }
}

/// Replace purely numeric path segments with [`ID_PLACEHOLDER`].
///
/// # Example
/// ```
/// use todo_server::http::middleware::normalize_path;
///
/// assert_eq!(normalize_path("/api/v1/todo/42"), "/api/v1/todo/{id}");
/// assert_eq!(normalize_path("/api/v1/todo"), "/api/v1/todo");
/// ```
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                ID_PLACEHOLDER
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Body excerpt suitable for a log field.
fn body_excerpt(bytes: &Bytes) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.char_indices().nth(MAX_LOGGED_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.into_owned(),
    }
}

/// Middleware entry point, installed with `axum::middleware::from_fn`.
pub async fn request_context(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let ctx = RequestContext::new(req.method().clone(), req.uri().path());
    let log_bodies = ctx.method != Method::GET;

    let mut req = if log_bodies {
        let (parts, body) = req.into_parts();
        let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(
                    transaction_id = %ctx.transaction_id,
                    method = %ctx.method,
                    endpoint = %ctx.endpoint,
                    error = %err,
                    "Rejected request body"
                );
                let response = ApiError::PayloadTooLarge {
                    limit: MAX_BODY_BYTES,
                }
                .into_response();
                return with_transaction_id(response, &ctx);
            }
        };
        tracing::info!(
            transaction_id = %ctx.transaction_id,
            method = %ctx.method,
            endpoint = %ctx.endpoint,
            body = %body_excerpt(&bytes),
            "Request body"
        );
        Request::from_parts(parts, Body::from(bytes))
    } else {
        req
    };
    req.extensions_mut().insert(ctx.clone());

    let mut response = next.run(req).await;

    if log_bodies {
        let (parts, body) = response.into_parts();
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(
                    transaction_id = %ctx.transaction_id,
                    error = %err,
                    "Failed to buffer response body"
                );
                Bytes::new()
            }
        };
        tracing::info!(
            transaction_id = %ctx.transaction_id,
            method = %ctx.method,
            endpoint = %ctx.endpoint,
            body = %body_excerpt(&bytes),
            "Response body"
        );
        response = Response::from_parts(parts, Body::from(bytes));
    }

    tracing::info!(
        transaction_id = %ctx.transaction_id,
        method = %ctx.method,
        endpoint = %ctx.endpoint,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "Request completed"
    );

    with_transaction_id(response, &ctx)
}

fn with_transaction_id(mut response: Response, ctx: &RequestContext) -> Response {
    if let Ok(value) = HeaderValue::from_str(&ctx.transaction_id.to_string()) {
        response.headers_mut().insert(TRANSACTION_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_segments_share_one_key() {
        assert_eq!(normalize_path("/api/v1/todo/42"), "/api/v1/todo/{id}");
        assert_eq!(
            normalize_path("/api/v1/todo/42"),
            normalize_path("/api/v1/todo/7")
        );
    }

    #[test]
    fn non_numeric_segments_are_kept() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/api/v1/todo/42abc"), "/api/v1/todo/42abc");
        assert_eq!(normalize_path("/api/v1/todo/-1"), "/api/v1/todo/-1");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/todo/"), "/todo/");
    }

    #[test]
    fn every_numeric_segment_is_replaced() {
        assert_eq!(normalize_path("/a/1/b/22"), "/a/{id}/b/{id}");
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = Bytes::from("x".repeat(MAX_LOGGED_CHARS + 10));
        let excerpt = body_excerpt(&long);
        assert_eq!(excerpt.chars().count(), MAX_LOGGED_CHARS + 1);
        assert!(excerpt.ends_with('…'));

        assert_eq!(body_excerpt(&Bytes::from_static(b"{}")), "{}");
    }

    #[test]
    fn context_normalizes_endpoint() {
        let ctx = RequestContext::new(Method::PATCH, "/api/v1/todo/9");
        assert_eq!(ctx.endpoint, "/api/v1/todo/{id}");
        assert_eq!(ctx.method, Method::PATCH);
    }
}
