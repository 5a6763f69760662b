//! Error types for the progress log engine
//!
//! "No data" is deliberately absent from this enum: an empty window is a valid
//! terminal state and is reported as `None` by the summary builder.

use chrono::NaiveDate;

use crate::models::MetricKind;

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
  /// The store returned a cardinality or row shape that cannot happen
  #[error("Data integrity violation: {0}")]
  DataIntegrity(String),

  #[error("Record store unavailable: {0}")]
  StoreUnavailable(String),

  /// Insert raced with another writer for the same key
  #[error("Uniqueness conflict for {user_id} on {day} ({kind})")]
  UniquenessConflict {
    user_id: String,
    day: NaiveDate,
    kind: MetricKind,
  },

  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Migration failed: {0}")]
  Migration(String),

  #[error("Unknown goal: {0}")]
  UnknownGoal(String),
}

pub type Result<T> = std::result::Result<T, ProgressError>;

impl From<sqlx::Error> for ProgressError {
  fn from(e: sqlx::Error) -> Self {
    match e {
      // A stored row that cannot be read back is bad data, not a bad connection
      sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
        ProgressError::DataIntegrity(e.to_string())
      }
      _ => ProgressError::StoreUnavailable(e.to_string()),
    }
  }
}

impl From<sqlx::migrate::MigrateError> for ProgressError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    ProgressError::Migration(e.to_string())
  }
}
