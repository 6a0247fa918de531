//! Load [`AppConfig`] from the environment (and `.env`, when present).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::str::FromStr;

/// Read settings from process environment after loading `.env`, then validate.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "ignoring unreadable .env file");
        }
    }
    load_with(|key| std::env::var(key).ok())
}

/// Build settings from an arbitrary key lookup; unset or empty keys take defaults.
pub fn load_with<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let defaults = AppConfig::default();

    let config = AppConfig {
        database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
        schema: get("STUDENTS_SCHEMA").unwrap_or(defaults.schema),
        storage: match get("STORAGE_BACKEND") {
            Some(v) => v.parse()?,
            None => defaults.storage,
        },
        bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
        max_connections: parse_or("MAX_CONNECTIONS", get("MAX_CONNECTIONS"), defaults.max_connections)?,
        max_page_size: parse_or("MAX_PAGE_SIZE", get("MAX_PAGE_SIZE"), defaults.max_page_size)?,
        max_body_bytes: parse_or("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), defaults.max_body_bytes)?,
    };
    validate(&config)?;
    Ok(config)
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: format!("'{}': {}", v, e),
        }),
        None => Ok(default),
    }
}
