//! Progress summaries per metric family
//!
//! Each metric kind maps to a pair of plain functions: one reduces the window's
//! records to numbers, the other renders them. Weight, steps, calories and the
//! nutrient kinds compare the earliest and latest record in the window;
//! workouts are summarized by completion counts per week.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregation::{average_per_week, round2, week_buckets, WeekBucket};
use crate::bucketing::TimeWindow;
use crate::delta::{delta, Delta, Direction, GoalDirection, NO_PROGRESS};
use crate::error::Result;
use crate::models::{MetricKind, MetricRecord};
use crate::store::MetricStore;

/// Completion statistics for workout summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCompletion {
  pub total_completed: u32,
  pub average_per_week: f64,
  pub buckets: Vec<WeekBucket>,
}

/// Externally visible progress for one metric kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
  pub metric_kind: MetricKind,
  pub initial_value: f64,
  pub latest_value: f64,
  pub delta: f64,
  pub direction: Direction,
  pub formatted_message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weekly: Option<WeeklyCompletion>,
}

impl ProgressSummary {
  pub fn to_json(&self) -> String {
    serde_json::to_string(self).unwrap_or_default()
  }
}

/// Reduced numbers for one metric family, before formatting
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryValues {
  pub initial: f64,
  pub latest: f64,
  pub delta: Delta,
  pub weekly: Option<WeeklyCompletion>,
}

pub type ComputeFn = fn(&[MetricRecord], GoalDirection) -> Option<SummaryValues>;
pub type FormatFn = fn(MetricKind, &SummaryValues, GoalDirection) -> String;

/// Compute and format functions for a metric kind
#[derive(Clone, Copy)]
pub struct MetricHandler {
  pub compute: ComputeFn,
  pub format: FormatFn,
}

pub fn handler_for(kind: MetricKind) -> MetricHandler {
  match kind {
    MetricKind::Weight => MetricHandler {
      compute: two_point,
      format: format_weight,
    },
    MetricKind::Steps => MetricHandler {
      compute: two_point,
      format: format_steps,
    },
    MetricKind::Calories => MetricHandler {
      compute: two_point,
      format: format_calories,
    },
    MetricKind::WorkoutCompletion => MetricHandler {
      compute: completion_counts,
      format: format_workouts,
    },
    MetricKind::Protein | MetricKind::Carbohydrates | MetricKind::Fat => MetricHandler {
      compute: two_point,
      format: format_nutrient,
    },
  }
}

/// Build a summary from one window's records
///
/// `None` means there is nothing to show. It is not an error.
pub fn build_summary(
  kind: MetricKind,
  goal: GoalDirection,
  records: &[MetricRecord],
) -> Option<ProgressSummary> {
  let handler = handler_for(kind);
  let values = (handler.compute)(records, goal)?;
  let formatted_message = (handler.format)(kind, &values, goal);

  Some(ProgressSummary {
    metric_kind: kind,
    initial_value: values.initial,
    latest_value: values.latest,
    delta: values.delta.value,
    direction: values.delta.direction,
    formatted_message,
    weekly: values.weekly,
  })
}

/// Load a user's records for the window and summarize them
///
/// Without a window, all history up to now is used.
pub async fn compute_summary<S: MetricStore + ?Sized>(
  store: &S,
  user_id: &str,
  kind: MetricKind,
  goal: GoalDirection,
  window: Option<TimeWindow>,
) -> Result<Option<ProgressSummary>> {
  let (start, end) = match window {
    Some(w) => (Some(w.start), w.end),
    None => (None, Utc::now()),
  };

  let records = store.find_range(user_id, kind, start, end).await?;
  let summary = build_summary(kind, goal, &records);

  if summary.is_none() {
    debug!(user_id, %kind, "No records to summarize");
  }

  Ok(summary)
}

// ---------------------------------------------------------------------------
// Compute functions
// ---------------------------------------------------------------------------

/// Earliest vs. latest record
fn two_point(records: &[MetricRecord], goal: GoalDirection) -> Option<SummaryValues> {
  let earliest = records.iter().min_by_key(|r| r.day)?;
  let latest = records.iter().max_by_key(|r| r.day)?;

  Some(SummaryValues {
    initial: earliest.value,
    latest: latest.value,
    delta: delta(earliest.value, latest.value, goal),
    weekly: None,
  })
}

/// Completed workouts across the window
fn completion_counts(records: &[MetricRecord], _goal: GoalDirection) -> Option<SummaryValues> {
  if records.is_empty() {
    return None;
  }

  let completed: Vec<MetricRecord> = records.iter().filter(|r| r.is_completed()).cloned().collect();
  let total = completed.len() as u32;

  Some(SummaryValues {
    initial: 0.0,
    latest: total as f64,
    delta: delta(0.0, total as f64, GoalDirection::Increase),
    weekly: Some(WeeklyCompletion {
      total_completed: total,
      average_per_week: average_per_week(&completed),
      buckets: week_buckets(&completed),
    }),
  })
}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

fn num(value: f64) -> String {
  round2(value).to_string()
}

fn verb(goal: GoalDirection) -> &'static str {
  match goal {
    GoalDirection::Increase => "increased",
    GoalDirection::Decrease => "decreased",
  }
}

fn progress_text(values: &SummaryValues, progressed: impl FnOnce(f64) -> String) -> String {
  if values.delta.is_progress() {
    progressed(values.delta.value)
  } else {
    NO_PROGRESS.to_string()
  }
}

fn format_weight(_kind: MetricKind, values: &SummaryValues, goal: GoalDirection) -> String {
  let status = progress_text(values, |d| {
    let word = match goal {
      GoalDirection::Decrease => "lost",
      GoalDirection::Increase => "gained",
    };
    format!("{}kg {}", num(d), word)
  });
  format!(
    "Initial Weight: {}kg, Latest Weight: {}kg, Progress: {}.",
    num(values.initial),
    num(values.latest),
    status
  )
}

fn format_steps(_kind: MetricKind, values: &SummaryValues, goal: GoalDirection) -> String {
  let status = progress_text(values, |d| format!("{} steps {}", num(d), verb(goal)));
  format!(
    "Initial Steps: {}, Latest Steps: {}, Progress: {}.",
    num(values.initial),
    num(values.latest),
    status
  )
}

fn format_calories(_kind: MetricKind, values: &SummaryValues, goal: GoalDirection) -> String {
  let status = progress_text(values, |d| format!("{} kcal {}", num(d), verb(goal)));
  format!(
    "Initial Calories: {} kcal, Latest Calories: {} kcal, Progress: {}.",
    num(values.initial),
    num(values.latest),
    status
  )
}

fn format_workouts(_kind: MetricKind, values: &SummaryValues, _goal: GoalDirection) -> String {
  let (total, per_week) = values
    .weekly
    .as_ref()
    .map(|w| (w.total_completed, w.average_per_week))
    .unwrap_or((0, 0.0));
  format!(
    "Total completed Workouts: {}, Completed workouts per Week: {}",
    total,
    num(per_week)
  )
}

fn format_nutrient(kind: MetricKind, values: &SummaryValues, goal: GoalDirection) -> String {
  let label = match kind {
    MetricKind::Protein => "Protein",
    MetricKind::Carbohydrates => "Carbohydrates",
    MetricKind::Fat => "Fat",
    _ => "Intake",
  };
  let status = progress_text(values, |d| format!("{}g {}", num(d), verb(goal)));
  format!(
    "Initial {label}: {}g, Latest {label}: {}g, Progress: {}.",
    num(values.initial),
    num(values.latest),
    status
  )
}
