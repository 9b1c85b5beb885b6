//! Router-level tests over the in-memory repository

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_server::db::MemoryTodoRepo;
use todo_server::http::TRANSACTION_ID_HEADER;
use todo_server::{build_router, AppState};

fn app(test_mode: bool) -> Router {
    build_router(AppState::new(Arc::new(MemoryTodoRepo::new()), test_mode))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, body) = send_full(app, method, uri, body).await;
    (status, body)
}

async fn send_full(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

async fn create(app: &Router, username: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/todo",
        Some(json!({ "username": username, "email": email, "full_name": "Test User" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn health_and_info() {
    let app = app(true);

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/api/v1/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "todo-server");
    assert_eq!(body["test_mode"], true);
}

#[tokio::test]
async fn create_then_get() {
    let app = app(true);
    let created = create(&app, "ada", "ada@example.com").await;

    assert_eq!(created["username"], "ada");
    assert_eq!(created["full_name"], "Test User");
    assert_eq!(created["created_at"], created["updated_at"]);

    let uri = format!("/api/v1/todo/{}", created["id"]);
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_without_full_name() {
    let app = app(true);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/todo",
        Some(json!({ "username": "grace", "email": "grace@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], Value::Null);
}

#[tokio::test]
async fn create_rejects_invalid_input() {
    let app = app(true);

    for payload in [
        json!({ "email": "ada@example.com" }),
        json!({ "username": "ada" }),
        json!({ "username": "", "email": "ada@example.com" }),
        json!({ "username": "ada", "email": "not-an-email" }),
    ] {
        let (status, body) = send(&app, Method::POST, "/api/v1/todo", Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    let (_, list) = send(&app, Method::GET, "/api/v1/todo", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn duplicate_username_or_email_is_conflict() {
    let app = app(true);
    let original = create(&app, "ada", "ada@example.com").await;

    for payload in [
        json!({ "username": "ada", "email": "other@example.com" }),
        json!({ "username": "other", "email": "ada@example.com" }),
    ] {
        let (status, body) = send(&app, Method::POST, "/api/v1/todo", Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }

    let uri = format!("/api/v1/todo/{}", original["id"]);
    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, original);
}

#[tokio::test]
async fn pagination_windows() {
    let app = app(true);
    for i in 0..3 {
        create(&app, &format!("user{i}"), &format!("user{i}@example.com")).await;
    }

    let (status, page1) = send(&app, Method::GET, "/api/v1/todo?page=1&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = page1
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (status, page2) = send(&app, Method::GET, "/api/v1/todo?page=2&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page2, json!([]));

    let (_, small) = send(&app, Method::GET, "/api/v1/todo?page=2&limit=2", None).await;
    assert_eq!(small.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn pagination_rejects_bad_parameters() {
    let app = app(true);
    for uri in [
        "/api/v1/todo?page=0",
        "/api/v1/todo?limit=0",
        "/api/v1/todo?limit=101",
        "/api/v1/todo?page=abc",
    ] {
        let (status, _) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let app = app(true);

    let (status, body) = send(&app, Method::GET, "/api/v1/todo/99999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("not found"));

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/todo/99999",
        Some(json!({ "username": "ada", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/todo/99999",
        Some(json!({ "username": "ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_validation_error() {
    let app = app(true);
    let (status, body) = send(&app, Method::GET, "/api/v1/todo/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn full_update_replaces_all_fields() {
    let app = app(true);
    let created = create(&app, "ada", "ada@example.com").await;
    let uri = format!("/api/v1/todo/{}", created["id"]);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "username": "lovelace", "email": "lovelace@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["username"], "lovelace");
    assert_eq!(updated["email"], "lovelace@example.com");
    assert_eq!(updated["full_name"], Value::Null);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);
}

#[tokio::test]
async fn full_update_into_taken_username_conflicts() {
    let app = app(true);
    create(&app, "ada", "ada@example.com").await;
    let grace = create(&app, "grace", "grace@example.com").await;
    let uri = format!("/api/v1/todo/{}", grace["id"]);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "username": "ada", "email": "grace@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn partial_update_keeps_unspecified_fields() {
    let app = app(true);
    let created = create(&app, "ada", "ada@example.com").await;
    let uri = format!("/api/v1/todo/{}", created["id"]);

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "email": "countess@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["username"], created["username"]);
    assert_eq!(updated["full_name"], created["full_name"]);
    assert_eq!(updated["email"], "countess@example.com");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);

    let (_, cleared) = send(&app, Method::PATCH, &uri, Some(json!({ "full_name": null }))).await;
    assert_eq!(cleared["full_name"], Value::Null);
    assert_eq!(cleared["email"], "countess@example.com");
}

#[tokio::test]
async fn delete_then_delete_again() {
    let app = app(true);
    let created = create(&app, "ada", "ada@example.com").await;
    let uri = format!("/api/v1/todo/{}", created["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["detail"],
        format!("Todo with id {} deleted successfully", created["id"])
    );

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn middleware_sets_transaction_id() {
    let app = app(false);

    let (status, headers, _) = send_full(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let first = headers
        .get(TRANSACTION_ID_HEADER)
        .expect("transaction id header")
        .to_str()
        .unwrap()
        .to_owned();
    assert!(uuid_like(&first));

    let (status, headers, body) = send_full(
        &app,
        Method::POST,
        "/api/v1/todo",
        Some(json!({ "username": "ada", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    let second = headers.get(TRANSACTION_ID_HEADER).unwrap().to_str().unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn middleware_passes_request_body_through() {
    let app = app(false);
    let created = create(&app, "ada", "ada@example.com").await;
    let uri = format!("/api/v1/todo/{}", created["id"]);

    let (status, headers, body) =
        send_full(&app, Method::PATCH, &uri, Some(json!({ "full_name": "Ada" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Ada");
    assert!(headers.contains_key(TRANSACTION_ID_HEADER));
}

#[tokio::test]
async fn middleware_header_on_error_responses() {
    let app = app(false);
    let (status, headers, _) = send_full(&app, Method::DELETE, "/api/v1/todo/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.contains_key(TRANSACTION_ID_HEADER));
}

#[tokio::test]
async fn oversized_body_is_rejected_before_handler() {
    let app = app(false);
    let payload = json!({
        "username": "x".repeat(2 * 1024 * 1024),
        "email": "big@example.com",
    });

    let (status, headers, body) = send_full(&app, Method::POST, "/api/v1/todo", Some(payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "payload_too_large");
    assert!(headers.contains_key(TRANSACTION_ID_HEADER));

    let (_, list) = send(&app, Method::GET, "/api/v1/todo", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_mode_disables_middleware() {
    let app = app(true);
    let (_, headers, _) = send_full(&app, Method::GET, "/api/v1/health", None).await;
    assert!(!headers.contains_key(TRANSACTION_ID_HEADER));
}

fn uuid_like(s: &str) -> bool {
    s.len() == 36 && s.chars().filter(|c| *c == '-').count() == 4
}
