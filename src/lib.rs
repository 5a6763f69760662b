//! Daily activity log engine
//!
//! Writes one value per (user, day, metric kind) and turns a user's logged
//! history into progress summaries: deltas against a baseline for weight,
//! steps, calories and nutrients, and weekly completion counts for workouts.

pub mod aggregation;
pub mod bucketing;
pub mod config;
pub mod db;
pub mod delta;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod nutrients;
pub mod store;
pub mod summary;
pub mod upsert;

#[cfg(test)]
mod test_utils;

pub use bucketing::{Granularity, TimeWindow};
pub use config::AppConfig;
pub use db::AppState;
pub use delta::{Direction, GoalDirection};
pub use display::{display_progress, DisplayOutcome, FitnessGoal, ProgressDisplay};
pub use error::{ProgressError, Result};
pub use models::{MetricKind, MetricRecord};
pub use nutrients::{compute_nutrient_averages, record_nutrients, NutrientAverages, NutrientIntake};
pub use store::{MetricStore, SqliteMetricStore};
pub use summary::{build_summary, compute_summary, ProgressSummary};
pub use upsert::{record_log, UpsertOutcome};

/// Load `.env`, configure logging and open the database
pub async fn init() -> Result<AppState> {
  dotenvy::dotenv().ok();

  let config = AppConfig::from_env()?;
  logging::init_logging(&config);

  let pool = db::initialize_db(&config).await?;
  Ok(AppState { db: pool })
}
