//! Idempotent daily log writes
//!
//! `record_log` keeps at most one record per (user, day, kind). The lookup and
//! the write are separate store calls, so two writers can both miss on lookup.
//! The store's unique index turns the losing insert into a `UniquenessConflict`,
//! which is retried once as an update: the last writer wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ProgressError, Result};
use crate::models::{MetricKind, MetricRecord};
use crate::store::MetricStore;

/// What a log write did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
  Created,
  Updated,
  /// Stored value already matched; nothing was written
  Noop,
}

impl std::fmt::Display for UpsertOutcome {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Created => write!(f, "created"),
      Self::Updated => write!(f, "updated"),
      Self::Noop => write!(f, "no update needed"),
    }
  }
}

/// Record `value` for the UTC day containing `date`
pub async fn record_log<S: MetricStore + ?Sized>(
  store: &S,
  user_id: &str,
  date: DateTime<Utc>,
  kind: MetricKind,
  value: f64,
) -> Result<UpsertOutcome> {
  let record = MetricRecord::new(user_id, date, kind, value);

  if let Some(existing) = store.find_one(user_id, record.day, kind).await? {
    return update_or_noop(store, &existing, value).await;
  }

  match store.insert(&record).await {
    Ok(()) => {
      debug!(user_id, day = %record.day_key(), %kind, value, "Created log record");
      Ok(UpsertOutcome::Created)
    }
    Err(ProgressError::UniquenessConflict { .. }) => {
      warn!(
        user_id,
        day = %record.day_key(),
        %kind,
        "Concurrent insert detected, retrying as update"
      );
      retry_after_conflict(store, &record).await
    }
    Err(e) => Err(e),
  }
}

/// Single read-after-conflict retry
async fn retry_after_conflict<S: MetricStore + ?Sized>(
  store: &S,
  record: &MetricRecord,
) -> Result<UpsertOutcome> {
  match store
    .find_one(&record.user_id, record.day, record.metric_kind)
    .await?
  {
    Some(existing) => update_or_noop(store, &existing, record.value).await,
    None => Err(ProgressError::UniquenessConflict {
      user_id: record.user_id.clone(),
      day: record.day_key(),
      kind: record.metric_kind,
    }),
  }
}

async fn update_or_noop<S: MetricStore + ?Sized>(
  store: &S,
  existing: &MetricRecord,
  value: f64,
) -> Result<UpsertOutcome> {
  if existing.value == value {
    debug!(
      user_id = %existing.user_id,
      day = %existing.day_key(),
      kind = %existing.metric_kind,
      "Log value unchanged"
    );
    return Ok(UpsertOutcome::Noop);
  }

  store
    .update_value(&existing.user_id, existing.day, existing.metric_kind, value)
    .await?;

  debug!(
    user_id = %existing.user_id,
    day = %existing.day_key(),
    kind = %existing.metric_kind,
    previous = existing.value,
    value,
    "Updated log record"
  );
  Ok(UpsertOutcome::Updated)
}
