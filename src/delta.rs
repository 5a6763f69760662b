//! Directional progress between a baseline and the latest observation

use serde::{Deserialize, Serialize};

/// Sentinel shown whenever a delta is not progress toward the goal
pub const NO_PROGRESS: &str = "No progress yet";

/// Which way the user wants the metric to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalDirection {
  Increase,
  Decrease,
}

/// Verdict attached to a delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  Increased,
  Decreased,
  /// Zero or negative progress; regressions are not surfaced separately
  NoChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delta {
  /// Signed progress toward the goal; kept even when not positive
  pub value: f64,
  pub direction: Direction,
}

impl Delta {
  pub fn is_progress(&self) -> bool {
    self.direction != Direction::NoChange
  }
}

/// Compute progress from `baseline` to `latest` for a goal direction
pub fn delta(baseline: f64, latest: f64, goal: GoalDirection) -> Delta {
  let (value, progressed) = match goal {
    GoalDirection::Decrease => (baseline - latest, Direction::Decreased),
    GoalDirection::Increase => (latest - baseline, Direction::Increased),
  };

  let direction = if value > 0.0 {
    progressed
  } else {
    Direction::NoChange
  };

  Delta { value, direction }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_weight_loss_progress() {
    let d = delta(80.0, 75.0, GoalDirection::Decrease);
    assert_eq!(d.value, 5.0);
    assert_eq!(d.direction, Direction::Decreased);
    assert!(d.is_progress());
  }

  #[test]
  fn test_weight_loss_regression_is_no_change() {
    let d = delta(80.0, 85.0, GoalDirection::Decrease);
    assert_eq!(d.value, -5.0);
    assert_eq!(d.direction, Direction::NoChange);
    assert!(!d.is_progress());
  }

  #[test]
  fn test_step_increase() {
    let d = delta(1000.0, 1200.0, GoalDirection::Increase);
    assert_eq!(d.value, 200.0);
    assert_eq!(d.direction, Direction::Increased);
  }

  #[test]
  fn test_unchanged_value_is_no_change() {
    for goal in [GoalDirection::Increase, GoalDirection::Decrease] {
      let d = delta(70.0, 70.0, goal);
      assert_eq!(d.value, 0.0);
      assert_eq!(d.direction, Direction::NoChange);
    }
  }

  #[test]
  fn test_weight_gain_goal() {
    let gained = delta(60.0, 62.5, GoalDirection::Increase);
    assert_eq!(gained.value, 2.5);
    assert_eq!(gained.direction, Direction::Increased);

    let lost = delta(60.0, 59.0, GoalDirection::Increase);
    assert_eq!(lost.direction, Direction::NoChange);
  }
}
