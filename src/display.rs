//! Presentation boundary
//!
//! The summary builder only returns values. Rendering goes through an injected
//! [`ProgressDisplay`], and every failure path ends in `hide()`.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::bucketing::TimeWindow;
use crate::delta::GoalDirection;
use crate::error::ProgressError;
use crate::models::MetricKind;
use crate::store::MetricStore;
use crate::summary::compute_summary;

/// Goals a user can pick, keyed by their display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
  LoseWeight,
  GainWeight,
  IncreaseStepCount,
  TrackDailyCalories,
  IncreaseFitness,
}

impl FitnessGoal {
  /// Metric to summarize and the direction that counts as progress
  pub fn target(&self) -> (MetricKind, GoalDirection) {
    match self {
      Self::LoseWeight => (MetricKind::Weight, GoalDirection::Decrease),
      Self::GainWeight => (MetricKind::Weight, GoalDirection::Increase),
      Self::IncreaseStepCount => (MetricKind::Steps, GoalDirection::Increase),
      Self::TrackDailyCalories => (MetricKind::Calories, GoalDirection::Increase),
      Self::IncreaseFitness => (MetricKind::WorkoutCompletion, GoalDirection::Increase),
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::LoseWeight => "Lose weight",
      Self::GainWeight => "Gain weight",
      Self::IncreaseStepCount => "Increase step count",
      Self::TrackDailyCalories => "Track daily calories",
      Self::IncreaseFitness => "Increase fitness (workout repetition)",
    }
  }
}

impl std::fmt::Display for FitnessGoal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

impl std::str::FromStr for FitnessGoal {
  type Err = ProgressError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Lose weight" => Ok(Self::LoseWeight),
      "Gain weight" => Ok(Self::GainWeight),
      "Increase step count" => Ok(Self::IncreaseStepCount),
      "Track daily calories" => Ok(Self::TrackDailyCalories),
      "Increase fitness (workout repetition)" => Ok(Self::IncreaseFitness),
      _ => Err(ProgressError::UnknownGoal(s.to_string())),
    }
  }
}

/// Rendering callback owned by the caller
pub trait ProgressDisplay {
  fn show(&mut self, message: &str);
  fn hide(&mut self);
}

/// Why the display ended up in its final state
///
/// Visible effect is the same for everything but `Shown`; the distinction is
/// kept for logging and callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOutcome {
  Shown,
  NoData,
  UnknownGoal,
  Failed,
}

/// Summarize a user's progress toward `goal_label` and render it
pub async fn display_progress<S: MetricStore + ?Sized>(
  store: &S,
  display: &mut dyn ProgressDisplay,
  goal_label: &str,
  user_id: &str,
  window: Option<TimeWindow>,
) -> DisplayOutcome {
  let goal: FitnessGoal = match goal_label.parse() {
    Ok(goal) => goal,
    Err(e) => {
      warn!(user_id, error = %e, "Hiding progress for unknown goal");
      display.hide();
      return DisplayOutcome::UnknownGoal;
    }
  };

  let (kind, direction) = goal.target();
  match compute_summary(store, user_id, kind, direction, window).await {
    Ok(Some(summary)) => {
      display.show(&summary.formatted_message);
      DisplayOutcome::Shown
    }
    Ok(None) => {
      debug!(user_id, %goal, "No progress data, hiding display");
      display.hide();
      DisplayOutcome::NoData
    }
    Err(e) => {
      error!(user_id, %goal, error = %e, "Error displaying progress");
      display.hide();
      DisplayOutcome::Failed
    }
  }
}
