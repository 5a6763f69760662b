//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Record seeding
//! - Time helpers
//! - Helper assertions

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::models::MetricKind;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert raw rows for one user and kind, bypassing the log writer
pub async fn seed_metric_records(
  pool: &SqlitePool,
  user_id: &str,
  kind: MetricKind,
  entries: &[(DateTime<Utc>, f64)],
) {
  for (day, value) in entries {
    sqlx::query(
      r#"
      INSERT INTO metric_records (user_id, day, metric_kind, value)
      VALUES (?1, ?2, ?3, ?4)
      "#,
    )
    .bind(user_id)
    .bind(day.date_naive())
    .bind(kind.as_str())
    .bind(value)
    .execute(pool)
    .await
    .expect("Failed to seed metric record");
  }
}

/// Count stored rows for a key
pub async fn count_records(pool: &SqlitePool, user_id: &str, kind: MetricKind) -> i64 {
  sqlx::query_scalar("SELECT COUNT(*) FROM metric_records WHERE user_id = ?1 AND metric_kind = ?2")
    .bind(user_id)
    .bind(kind.as_str())
    .fetch_one(pool)
    .await
    .expect("Failed to count records")
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// UTC midnight of a calendar date
pub fn utc_day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(year, month, day, 0, 0, 0)
    .single()
    .expect("invalid test date")
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name = 'metric_records'"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_records_returns_correct_count() {
    let pool = setup_test_db().await;

    seed_metric_records(
      &pool,
      "alice",
      MetricKind::Calories,
      &[(utc_day(2024, 1, 1), 2100.0), (utc_day(2024, 1, 2), 1900.0)],
    )
    .await;

    assert_eq!(count_records(&pool, "alice", MetricKind::Calories).await, 2);
    assert_eq!(count_records(&pool, "alice", MetricKind::Weight).await, 0);

    teardown_test_db(pool).await;
  }
}
