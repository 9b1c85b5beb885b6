//! Repository interface for the todo table
//!
//! Handlers talk to `dyn TodoRepository`; the Postgres implementation is
//! used in production and the in-memory one in tests.
//! Both rely on the store to enforce uniqueness (no check-then-insert).

pub mod memory;
pub mod todos;

use async_trait::async_trait;

use crate::models::{NewTodo, Pagination, Todo, TodoChanges};

pub use memory::MemoryTodoRepo;
pub use todos::PgTodoRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {field} '{value}' already exists")]
    Conflict { field: &'static str, value: String },
}

impl DbError {
    pub(crate) fn todo_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "todo",
            id: id.to_string(),
        }
    }
}

/// Storage operations for todo records
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Page of records ordered by id. Pages past the end are empty.
    async fn list(&self, page: Pagination) -> Result<Vec<Todo>, DbError>;

    async fn get(&self, id: i64) -> Result<Todo, DbError>;

    /// Insert a record; both timestamps are set to the insert time.
    async fn create(&self, new: NewTodo) -> Result<Todo, DbError>;

    /// Overwrite every field of an existing record.
    async fn replace(&self, id: i64, new: NewTodo) -> Result<Todo, DbError>;

    /// Overwrite only the fields present in `changes`.
    async fn update(&self, id: i64, changes: TodoChanges) -> Result<Todo, DbError>;

    async fn delete(&self, id: i64) -> Result<(), DbError>;

    /// Connectivity probe used by health checks and startup.
    async fn ping(&self) -> Result<(), DbError>;
}
