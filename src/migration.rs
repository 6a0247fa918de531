//! Idempotent DDL for the students table.

use crate::error::AppError;
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;

/// Statements that create the schema and the `students` table if they do not exist.
/// Column checks mirror the inbound field rules; `email` carries the unique constraint.
pub fn migration_statements(schema: &str) -> Vec<String> {
    let table = qualified_table(schema);
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                "id" BIGSERIAL PRIMARY KEY,
                "name" VARCHAR(100) NOT NULL CHECK (char_length("name") BETWEEN 2 AND 100),
                "email" VARCHAR(255) NOT NULL,
                "course" VARCHAR(100) NOT NULL CHECK (char_length("course") BETWEEN 2 AND 100),
                "age" INTEGER NOT NULL CHECK ("age" BETWEEN 18 AND 100),
                CONSTRAINT "students_email_key" UNIQUE ("email")
            )
            "#,
            table
        ),
    ]
}

pub async fn apply_migrations(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    for sql in migration_statements(schema) {
        tracing::debug!(sql = %sql.trim(), "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!(schema, "students table ready");
    Ok(())
}
