//! Database bootstrap: create the target database if missing and open the pool.

use crate::config::AppConfig;
use crate::error::{AppError, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Connect to the `postgres` admin database and create the database named in `database_url` if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url).map_err(|e| invalid_url(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", crate::sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

pub async fn connect_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

fn invalid_url(reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: "DATABASE_URL",
        reason: reason.into(),
    }
}

/// Split `postgres://host/db?opts` into (`postgres://host/postgres?opts`, `db`).
/// A URL without a database path yields an empty name and is returned unchanged.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let (base, query) = match url.split_once('?') {
        Some((base, q)) => (base, Some(q)),
        None => (url, None),
    };
    let authority_start = base.find("://").ok_or_else(|| invalid_url("missing scheme"))? + 3;
    let Some(slash) = base[authority_start..].find('/') else {
        return Ok((url.to_string(), String::new()));
    };
    let (prefix, db_name) = base.split_at(authority_start + slash + 1);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", prefix, q),
        None => format!("{}postgres", prefix),
    };
    Ok((admin_url, db_name.trim().to_string()))
}
