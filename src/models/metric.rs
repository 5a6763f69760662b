use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bucketing::normalize_to_day;
use crate::error::ProgressError;

/// Kind of daily measurement a user can log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
  Weight,
  Steps,
  Calories,
  /// Boolean-like: 1.0 completed, 0.0 not completed
  WorkoutCompletion,
  Protein,
  Carbohydrates,
  Fat,
}

impl MetricKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Weight => "weight",
      Self::Steps => "steps",
      Self::Calories => "calories",
      Self::WorkoutCompletion => "workout_completion",
      Self::Protein => "protein",
      Self::Carbohydrates => "carbohydrates",
      Self::Fat => "fat",
    }
  }
}

impl std::fmt::Display for MetricKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for MetricKind {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "weight" => Ok(Self::Weight),
      "steps" => Ok(Self::Steps),
      "calories" => Ok(Self::Calories),
      "workout_completion" => Ok(Self::WorkoutCompletion),
      "protein" => Ok(Self::Protein),
      "carbohydrates" => Ok(Self::Carbohydrates),
      "fat" => Ok(Self::Fat),
      _ => Err(format!("Unknown metric kind: {}", s)),
    }
  }
}

/// One logged value for a (user, day, kind) key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
  pub user_id: String,
  /// Always UTC midnight
  pub day: DateTime<Utc>,
  pub metric_kind: MetricKind,
  pub value: f64,
}

impl MetricRecord {
  /// Build a record, truncating `at` to its UTC day
  pub fn new(user_id: impl Into<String>, at: DateTime<Utc>, metric_kind: MetricKind, value: f64) -> Self {
    Self {
      user_id: user_id.into(),
      day: normalize_to_day(at),
      metric_kind,
      value,
    }
  }

  /// Calendar date used as the storage key
  pub fn day_key(&self) -> NaiveDate {
    self.day.date_naive()
  }

  /// Workout completion status; any positive value counts as completed
  pub fn is_completed(&self) -> bool {
    self.value > 0.0
  }
}

/// Row shape of the `metric_records` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MetricRow {
  pub user_id: String,
  pub day: NaiveDate,
  pub metric_kind: String,
  pub value: f64,
}

impl TryFrom<MetricRow> for MetricRecord {
  type Error = ProgressError;

  fn try_from(row: MetricRow) -> Result<Self, Self::Error> {
    let metric_kind = row
      .metric_kind
      .parse::<MetricKind>()
      .map_err(ProgressError::DataIntegrity)?;

    Ok(Self {
      user_id: row.user_id,
      day: row.day.and_time(NaiveTime::MIN).and_utc(),
      metric_kind,
      value: row.value,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_metric_kind_roundtrips_through_text() {
    for kind in [
      MetricKind::Weight,
      MetricKind::Steps,
      MetricKind::Calories,
      MetricKind::WorkoutCompletion,
      MetricKind::Protein,
      MetricKind::Carbohydrates,
      MetricKind::Fat,
    ] {
      assert_eq!(kind.to_string().parse::<MetricKind>(), Ok(kind));
    }
    assert!("bench_press".parse::<MetricKind>().is_err());
  }

  #[test]
  fn test_new_record_truncates_to_day() {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 18, 45, 12).unwrap();
    let record = MetricRecord::new("alice", at, MetricKind::Weight, 70.0);

    assert_eq!(record.day, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(record.day_key(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
  }

  #[test]
  fn test_row_with_unknown_kind_is_integrity_error() {
    let row = MetricRow {
      user_id: "alice".to_string(),
      day: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      metric_kind: "mood".to_string(),
      value: 1.0,
    };

    let err = MetricRecord::try_from(row).unwrap_err();
    assert!(matches!(err, ProgressError::DataIntegrity(_)));
  }

  #[test]
  fn test_completion_status() {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(MetricRecord::new("bob", at, MetricKind::WorkoutCompletion, 1.0).is_completed());
    assert!(!MetricRecord::new("bob", at, MetricKind::WorkoutCompletion, 0.0).is_completed());
  }
}
