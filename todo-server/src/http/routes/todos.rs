//! Todo endpoints - list, read, create, full/partial update, delete

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{TodoId, ValidJson, ValidQuery};
use crate::http::middleware::RequestContext;
use crate::http::server::AppState;
use crate::models::{NewTodo, Pagination, PaginationParams, Todo, TodoChanges};

/// Create / full update request. Omitting `full_name` clears it on PUT.
#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl TodoRequest {
    fn validate(&self) -> Result<NewTodo, ApiError> {
        Ok(NewTodo::new(
            &self.username,
            &self.email,
            self.full_name.as_deref(),
        )?)
    }
}

/// Partial update request; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPatchRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `null` clears the name, absence keeps it
    #[serde(default, deserialize_with = "present")]
    pub full_name: Option<Option<String>>,
}

/// Distinguish an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TodoPatchRequest {
    fn validate(&self) -> Result<TodoChanges, ApiError> {
        Ok(TodoChanges::new(
            self.username.as_deref(),
            self.email.as_deref(),
            self.full_name.as_ref().map(|n| n.as_deref()),
        )?)
    }
}

/// Todo response
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            username: t.username,
            email: t.email,
            full_name: t.full_name,
            created_at: timestamp(t.created_at),
            updated_at: timestamp(t.updated_at),
        }
    }
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub detail: String,
}

impl DeleteResponse {
    fn for_id(id: i64) -> Self {
        Self {
            detail: format!("Todo with id {} deleted successfully", id),
        }
    }
}

/// GET /todo - list a page of todos ordered by id
async fn list_todos(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let page = Pagination::try_from(params)?;
    let todos = state.repo.list(page).await?;

    tracing::debug!(
        transaction_id = %ctx.transaction_id,
        page = page.page,
        limit = page.limit,
        count = todos.len(),
        "Listed todos"
    );
    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// POST /todo - create a new todo
async fn create_todo(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidJson(req): ValidJson<TodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let new = req.validate()?;
    let todo = state.repo.create(new).await?;

    tracing::info!(transaction_id = %ctx.transaction_id, id = todo.id, "Created todo");
    Ok(Json(TodoResponse::from(todo)))
}

/// GET /todo/{id} - get a single todo
async fn get_todo(
    State(state): State<Arc<AppState>>,
    TodoId(id): TodoId,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.repo.get(id).await?;
    Ok(Json(TodoResponse::from(todo)))
}

/// PUT /todo/{id} - replace every field
async fn replace_todo(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    TodoId(id): TodoId,
    ValidJson(req): ValidJson<TodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let new = req.validate()?;
    let todo = state.repo.replace(id, new).await?;

    tracing::info!(transaction_id = %ctx.transaction_id, id, "Replaced todo");
    Ok(Json(TodoResponse::from(todo)))
}

/// PATCH /todo/{id} - update only the provided fields
async fn update_todo(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    TodoId(id): TodoId,
    ValidJson(req): ValidJson<TodoPatchRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let changes = req.validate()?;
    let todo = state.repo.update(id, changes).await?;

    tracing::info!(transaction_id = %ctx.transaction_id, id, "Updated todo");
    Ok(Json(TodoResponse::from(todo)))
}

/// DELETE /todo/{id}
async fn delete_todo(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    TodoId(id): TodoId,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.repo.delete(id).await?;

    tracing::info!(transaction_id = %ctx.transaction_id, id, "Deleted todo");
    Ok(Json(DeleteResponse::for_id(id)))
}

/// Todo routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todo", get(list_todos).post(create_todo))
        .route(
            "/todo/{id}",
            get(get_todo)
                .put(replace_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_null_from_missing() {
        let missing: TodoPatchRequest = serde_json::from_str(r#"{"email":"a@b.io"}"#).unwrap();
        assert_eq!(missing.full_name, None);

        let null: TodoPatchRequest = serde_json::from_str(r#"{"full_name":null}"#).unwrap();
        assert_eq!(null.full_name, Some(None));

        let set: TodoPatchRequest = serde_json::from_str(r#"{"full_name":"Ada"}"#).unwrap();
        assert_eq!(set.full_name, Some(Some("Ada".to_string())));
    }

    #[test]
    fn create_requires_username_and_email() {
        assert!(serde_json::from_str::<TodoRequest>(r#"{"email":"a@b.io"}"#).is_err());
        assert!(serde_json::from_str::<TodoRequest>(r#"{"username":"ada"}"#).is_err());

        let req: TodoRequest =
            serde_json::from_str(r#"{"username":"ada","email":"a@b.io"}"#).unwrap();
        assert_eq!(req.full_name, None);
    }

    #[test]
    fn delete_confirmation_names_the_id() {
        let body = serde_json::to_value(DeleteResponse::for_id(42)).unwrap();
        assert_eq!(body["detail"], "Todo with id 42 deleted successfully");
    }

    #[test]
    fn timestamps_keep_microseconds() {
        let t = DateTime::parse_from_rfc3339("2025-01-02T03:04:05.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamp(t), "2025-01-02T03:04:05.123456Z");
    }
}
