//! In-memory todo repository
//!
//! Mirrors the Postgres semantics (id order, unique username/email,
//! strictly increasing updated_at) without a database. Backs the router
//! tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use super::{DbError, TodoRepository};
use crate::models::{NewTodo, Pagination, Todo, TodoChanges};

#[derive(Debug, Default)]
struct Store {
    rows: BTreeMap<i64, Todo>,
    last_id: i64,
}

impl Store {
    /// Reject the write if another row already holds the username or email.
    fn check_unique(&self, id: Option<i64>, username: &str, email: &str) -> Result<(), DbError> {
        for row in self.rows.values().filter(|r| Some(r.id) != id) {
            if row.username == username {
                return Err(DbError::Conflict {
                    field: "username",
                    value: username.to_owned(),
                });
            }
            if row.email == email {
                return Err(DbError::Conflict {
                    field: "email",
                    value: email.to_owned(),
                });
            }
        }
        Ok(())
    }
}

fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

/// Todo repository holding rows in process memory
#[derive(Debug, Default)]
pub struct MemoryTodoRepo {
    store: RwLock<Store>,
}

impl MemoryTodoRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.store.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepo {
    async fn list(&self, page: Pagination) -> Result<Vec<Todo>, DbError> {
        let store = self.store.read().await;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(store
            .rows
            .values()
            .skip(skip)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Todo, DbError> {
        let store = self.store.read().await;
        store
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::todo_not_found(id))
    }

    async fn create(&self, new: NewTodo) -> Result<Todo, DbError> {
        let mut store = self.store.write().await;
        store.check_unique(None, new.username.as_str(), new.email.as_str())?;

        store.last_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: store.last_id,
            username: new.username.as_str().to_owned(),
            email: new.email.as_str().to_owned(),
            full_name: new.full_name.map(|n| n.as_str().to_owned()),
            created_at: now,
            updated_at: now,
        };
        store.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn replace(&self, id: i64, new: NewTodo) -> Result<Todo, DbError> {
        let changes = TodoChanges {
            username: Some(new.username),
            email: Some(new.email),
            full_name: Some(new.full_name),
        };
        self.update(id, changes).await
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> Result<Todo, DbError> {
        let mut store = self.store.write().await;
        let mut todo = store
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::todo_not_found(id))?;

        changes.apply_to(&mut todo);
        store.check_unique(Some(id), &todo.username, &todo.email)?;
        todo.updated_at = next_updated_at(todo.updated_at);

        store.rows.insert(id, todo.clone());
        Ok(todo)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut store = self.store.write().await;
        store
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::todo_not_found(id))
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
