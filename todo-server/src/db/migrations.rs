//! Schema migration for the todo table

use sqlx::PgPool;

/// Create the todo table and its unique indexes if they don't exist.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running todo migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todo (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            full_name TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT todo_username_key UNIQUE (username),
            CONSTRAINT todo_email_key UNIQUE (email)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Todo migrations complete");
    Ok(())
}
