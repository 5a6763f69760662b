//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the caller (see [`crate::init`]).

use std::env;

use crate::error::ProgressError;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DATABASE_URL_VAR: &str = "PROGRESS_LOG_DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "PROGRESS_LOG_MAX_CONNECTIONS";
pub const LOG_LEVEL_VAR: &str = "PROGRESS_LOG_LOG_LEVEL";

const DEFAULT_DATABASE_URL: &str = "sqlite://progress-log.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub database_url: String,
  pub max_connections: u32,
  /// Default tracing filter; `RUST_LOG` overrides it
  pub log_level: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      max_connections: DEFAULT_MAX_CONNECTIONS,
      log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ProgressError> {
    let database_url = match env::var(DATABASE_URL_VAR) {
      Ok(url) if url.trim().is_empty() => {
        return Err(ProgressError::MissingConfig(DATABASE_URL_VAR.into()))
      }
      Ok(url) => url,
      Err(_) => DEFAULT_DATABASE_URL.to_string(),
    };

    let max_connections = match env::var(MAX_CONNECTIONS_VAR) {
      Ok(raw) => parse_max_connections(&raw)?,
      Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    let log_level = env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

    Ok(Self {
      database_url,
      max_connections,
      log_level,
    })
  }
}

fn parse_max_connections(raw: &str) -> Result<u32, ProgressError> {
  match raw.trim().parse::<u32>() {
    Ok(n) if n >= 1 => Ok(n),
    _ => Err(ProgressError::InvalidConfig(format!(
      "{} must be a positive integer, got {:?}",
      MAX_CONNECTIONS_VAR, raw
    ))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_defaults_when_unset() {
    temp_env::with_vars_unset([DATABASE_URL_VAR, MAX_CONNECTIONS_VAR, LOG_LEVEL_VAR], || {
      let config = AppConfig::from_env().unwrap();
      assert_eq!(config, AppConfig::default());
    });
  }

  #[test]
  #[serial]
  fn test_reads_overrides() {
    temp_env::with_vars(
      [
        (DATABASE_URL_VAR, Some("sqlite::memory:")),
        (MAX_CONNECTIONS_VAR, Some("2")),
        (LOG_LEVEL_VAR, Some("debug")),
      ],
      || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.log_level, "debug");
      },
    );
  }

  #[test]
  #[serial]
  fn test_rejects_zero_connections() {
    temp_env::with_var(MAX_CONNECTIONS_VAR, Some("0"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(matches!(err, ProgressError::InvalidConfig(_)));
    });
  }

  #[test]
  #[serial]
  fn test_blank_database_url_is_missing() {
    temp_env::with_var(DATABASE_URL_VAR, Some("  "), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(matches!(err, ProgressError::MissingConfig(_)));
    });
  }
}
