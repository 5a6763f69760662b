//! Day and week boundaries
//!
//! All boundaries are computed in UTC. Weeks are Sunday-anchored.

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregation window length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
  /// Last 7 days
  Weekly,
  /// Last calendar month
  Monthly,
}

/// A bounded range of days to aggregate over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
  pub granularity: Granularity,
}

impl TimeWindow {
  /// Window ending at `now`
  pub fn ending_at(now: DateTime<Utc>, granularity: Granularity) -> Self {
    Self {
      start: window_start(now, granularity),
      end: now,
      granularity,
    }
  }

  /// Window ending at the current instant
  pub fn ending_now(granularity: Granularity) -> Self {
    Self::ending_at(Utc::now(), granularity)
  }
}

/// Truncate to UTC midnight
pub fn normalize_to_day(ts: DateTime<Utc>) -> DateTime<Utc> {
  ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Sunday (UTC midnight) of the week containing `ts`
pub fn start_of_week(ts: DateTime<Utc>) -> DateTime<Utc> {
  let days_since_sunday = ts.weekday().num_days_from_sunday();
  normalize_to_day(ts - Duration::days(days_since_sunday as i64))
}

/// First instant of a window ending at `now`
///
/// Monthly windows keep the day of month and clamp to the end of a shorter
/// previous month (Mar 31 -> Feb 29). Time of day is preserved.
pub fn window_start(now: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
  match granularity {
    Granularity::Weekly => now - Duration::days(7),
    Granularity::Monthly => now
      .checked_sub_months(Months::new(1))
      // Only fails at the far edge of the representable range
      .unwrap_or(DateTime::<Utc>::MIN_UTC),
  }
}

/// First calendar day whose midnight is at or after `start`
pub fn first_day_on_or_after(start: DateTime<Utc>) -> DateTime<Utc> {
  let day = normalize_to_day(start);
  if day == start {
    day
  } else {
    day + Duration::days(1)
  }
}
