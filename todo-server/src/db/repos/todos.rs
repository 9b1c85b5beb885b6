//! Postgres todo repository
//!
//! Every mutation is a single statement, so no explicit transactions:
//! - create/replace/update: RETURNING the row, unique violations become conflicts
//! - update: COALESCE keeps unspecified columns
//! - updated_at: GREATEST(NOW(), previous + 1µs) so it strictly increases

use async_trait::async_trait;
use sqlx::PgPool;

use super::{DbError, TodoRepository};
use crate::models::{NewTodo, Pagination, Todo, TodoChanges};

const COLUMNS: &str = "id, username, email, full_name, created_at, updated_at";

/// Todo repository backed by a sqlx pool
#[derive(Debug, Clone)]
pub struct PgTodoRepo {
    pool: PgPool,
}

impl PgTodoRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map unique-constraint violations on username/email to `DbError::Conflict`.
fn map_unique_violation(err: sqlx::Error, new_username: &str, new_email: &str) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("todo_email_key") => DbError::Conflict {
                    field: "email",
                    value: new_email.to_owned(),
                },
                _ => DbError::Conflict {
                    field: "username",
                    value: new_username.to_owned(),
                },
            };
        }
    }
    DbError::Sqlx(err)
}

#[async_trait]
impl TodoRepository for PgTodoRepo {
    async fn list(&self, page: Pagination) -> Result<Vec<Todo>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM todo ORDER BY id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, Todo>(&query)
            .bind(i64::from(page.limit))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Todo, DbError> {
        let query = format!("SELECT {COLUMNS} FROM todo WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::todo_not_found(id))
    }

    async fn create(&self, new: NewTodo) -> Result<Todo, DbError> {
        let query = format!(
            r#"
            INSERT INTO todo (username, email, full_name, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(new.username.as_str())
            .bind(new.email.as_str())
            .bind(new.full_name.as_ref().map(|n| n.as_str()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, new.username.as_str(), new.email.as_str()))
    }

    async fn replace(&self, id: i64, new: NewTodo) -> Result<Todo, DbError> {
        let query = format!(
            r#"
            UPDATE todo
            SET username = $2,
                email = $3,
                full_name = $4,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(new.username.as_str())
            .bind(new.email.as_str())
            .bind(new.full_name.as_ref().map(|n| n.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, new.username.as_str(), new.email.as_str()))?
            .ok_or_else(|| DbError::todo_not_found(id))
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> Result<Todo, DbError> {
        let username = changes.username.as_ref().map(|u| u.as_str());
        let email = changes.email.as_ref().map(|e| e.as_str());
        let clear_or_set_name = changes.full_name.is_some();
        let full_name = changes
            .full_name
            .as_ref()
            .and_then(|n| n.as_ref())
            .map(|n| n.as_str());

        let query = format!(
            r#"
            UPDATE todo
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                full_name = CASE WHEN $4 THEN $5 ELSE full_name END,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(username)
            .bind(email)
            .bind(clear_or_set_name)
            .bind(full_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, username.unwrap_or_default(), email.unwrap_or_default())
            })?
            .ok_or_else(|| DbError::todo_not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM todo WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::todo_not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
