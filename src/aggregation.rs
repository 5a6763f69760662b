//! Window-scoped statistics over dated metric records
//!
//! Every function here partitions first and reduces second, so results do not
//! depend on input order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bucketing::start_of_week;
use crate::models::MetricRecord;

/// Count of records falling in one Sunday-anchored week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
  pub week_start: DateTime<Utc>,
  pub count: u32,
}

/// Arithmetic mean of the record values
///
/// Returns `None` for an empty slice. Callers must check before formatting.
pub fn average(records: &[MetricRecord]) -> Option<f64> {
  if records.is_empty() {
    return None;
  }
  let sum: f64 = records.iter().map(|r| r.value).sum();
  Some(sum / records.len() as f64)
}

/// Number of records per week start
pub fn bucket_by_week(records: &[MetricRecord]) -> BTreeMap<DateTime<Utc>, u32> {
  let mut buckets = BTreeMap::new();
  for record in records {
    *buckets.entry(start_of_week(record.day)).or_insert(0) += 1;
  }
  buckets
}

/// Buckets as a list ordered by week start
pub fn week_buckets(records: &[MetricRecord]) -> Vec<WeekBucket> {
  bucket_by_week(records)
    .into_iter()
    .map(|(week_start, count)| WeekBucket { week_start, count })
    .collect()
}

/// Records per distinct week, rounded to two decimals
///
/// Zero records means zero activity, so this returns 0.0 rather than `None`.
pub fn average_per_week(records: &[MetricRecord]) -> f64 {
  let buckets = bucket_by_week(records);
  if buckets.is_empty() {
    return 0.0;
  }
  let total: u32 = buckets.values().sum();
  round2(total as f64 / buckets.len() as f64)
}

pub(crate) fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}
