//! Config validation: limits and identifiers.

use crate::config::AppConfig;
use crate::error::ConfigError;

/// Plain, unquoted PostgreSQL identifier: letter or underscore, then letters, digits, underscores.
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if !is_plain_identifier(&config.schema) {
        return Err(ConfigError::InvalidValue {
            key: "STUDENTS_SCHEMA",
            reason: format!("'{}' is not a plain SQL identifier", config.schema),
        });
    }
    if config.max_connections == 0 {
        return Err(ConfigError::Validation("MAX_CONNECTIONS must be at least 1".into()));
    }
    if config.max_page_size == 0 {
        return Err(ConfigError::Validation("MAX_PAGE_SIZE must be at least 1".into()));
    }
    if config.max_body_bytes == 0 {
        return Err(ConfigError::Validation("MAX_BODY_BYTES must be at least 1".into()));
    }
    Ok(())
}
