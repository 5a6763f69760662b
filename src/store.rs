//! Record store seam
//!
//! The engine only ever talks to storage through [`MetricStore`]. The SQLite
//! implementation relies on the unique index over (user_id, day, metric_kind)
//! created by the migrations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::bucketing::first_day_on_or_after;
use crate::error::{ProgressError, Result};
use crate::models::{MetricKind, MetricRecord, MetricRow};

#[async_trait]
pub trait MetricStore: Send + Sync {
  /// Record for one (user, day, kind) key. `day` must be UTC midnight.
  async fn find_one(
    &self,
    user_id: &str,
    day: DateTime<Utc>,
    kind: MetricKind,
  ) -> Result<Option<MetricRecord>>;

  /// Records with `start <= day <= end`, ordered by day ascending.
  /// A `None` start means no lower bound.
  async fn find_range(
    &self,
    user_id: &str,
    kind: MetricKind,
    start: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
  ) -> Result<Vec<MetricRecord>>;

  /// Insert a new record. Fails with `UniquenessConflict` if the key exists.
  async fn insert(&self, record: &MetricRecord) -> Result<()>;

  /// Replace the value of an existing record
  async fn update_value(
    &self,
    user_id: &str,
    day: DateTime<Utc>,
    kind: MetricKind,
    value: f64,
  ) -> Result<()>;
}

/// `MetricStore` backed by the `metric_records` table
#[derive(Debug, Clone)]
pub struct SqliteMetricStore {
  pool: SqlitePool,
}

impl SqliteMetricStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl MetricStore for SqliteMetricStore {
  async fn find_one(
    &self,
    user_id: &str,
    day: DateTime<Utc>,
    kind: MetricKind,
  ) -> Result<Option<MetricRecord>> {
    // LIMIT 2 is enough to detect a duplicate key
    let mut rows = sqlx::query_as::<_, MetricRow>(
      r#"
      SELECT user_id, day, metric_kind, value
      FROM metric_records
      WHERE user_id = ?1 AND day = ?2 AND metric_kind = ?3
      LIMIT 2
      "#,
    )
    .bind(user_id)
    .bind(day.date_naive())
    .bind(kind.as_str())
    .fetch_all(&self.pool)
    .await?;

    if rows.len() > 1 {
      return Err(ProgressError::DataIntegrity(format!(
        "Multiple {} records for {} on {}",
        kind,
        user_id,
        day.date_naive()
      )));
    }

    rows.pop().map(MetricRecord::try_from).transpose()
  }

  async fn find_range(
    &self,
    user_id: &str,
    kind: MetricKind,
    start: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
  ) -> Result<Vec<MetricRecord>> {
    let first_day = start.map(|s| first_day_on_or_after(s).date_naive());

    let rows = sqlx::query_as::<_, MetricRow>(
      r#"
      SELECT user_id, day, metric_kind, value
      FROM metric_records
      WHERE user_id = ?1
        AND metric_kind = ?2
        AND (?3 IS NULL OR day >= ?3)
        AND day <= ?4
      ORDER BY day ASC
      "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(first_day)
    .bind(end.date_naive())
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(MetricRecord::try_from).collect()
  }

  async fn insert(&self, record: &MetricRecord) -> Result<()> {
    let result = sqlx::query(
      r#"
      INSERT INTO metric_records (user_id, day, metric_kind, value)
      VALUES (?1, ?2, ?3, ?4)
      "#,
    )
    .bind(&record.user_id)
    .bind(record.day_key())
    .bind(record.metric_kind.as_str())
    .bind(record.value)
    .execute(&self.pool)
    .await;

    match result {
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        Err(ProgressError::UniquenessConflict {
          user_id: record.user_id.clone(),
          day: record.day_key(),
          kind: record.metric_kind,
        })
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn update_value(
    &self,
    user_id: &str,
    day: DateTime<Utc>,
    kind: MetricKind,
    value: f64,
  ) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();

    let result = sqlx::query(
      r#"
      UPDATE metric_records
      SET value = ?1,
        updated_at = ?2
      WHERE user_id = ?3 AND day = ?4 AND metric_kind = ?5
      "#,
    )
    .bind(value)
    .bind(&updated_at)
    .bind(user_id)
    .bind(day.date_naive())
    .bind(kind.as_str())
    .execute(&self.pool)
    .await?;

    match result.rows_affected() {
      1 => Ok(()),
      0 => Err(ProgressError::DataIntegrity(format!(
        "No {} record to update for {} on {}",
        kind,
        user_id,
        day.date_naive()
      ))),
      n => Err(ProgressError::DataIntegrity(format!(
        "Update touched {} {} records for {} on {}",
        n,
        kind,
        user_id,
        day.date_naive()
      ))),
    }
  }
}
