//! Daily macronutrient logging and window averages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::average;
use crate::bucketing::TimeWindow;
use crate::error::Result;
use crate::models::MetricKind;
use crate::store::MetricStore;
use crate::upsert::{record_log, UpsertOutcome};

/// One day's intake in grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientIntake {
  pub protein: f64,
  pub carbohydrates: f64,
  pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientOutcomes {
  pub protein: UpsertOutcome,
  pub carbohydrates: UpsertOutcome,
  pub fat: UpsertOutcome,
}

/// Average grams per logged day; `None` when nothing was logged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientAverages {
  pub protein: Option<f64>,
  pub carbohydrates: Option<f64>,
  pub fat: Option<f64>,
}

impl NutrientAverages {
  pub fn is_empty(&self) -> bool {
    self.protein.is_none() && self.carbohydrates.is_none() && self.fat.is_none()
  }
}

/// Log all three macronutrients for the day containing `date`
pub async fn record_nutrients<S: MetricStore + ?Sized>(
  store: &S,
  user_id: &str,
  date: DateTime<Utc>,
  intake: &NutrientIntake,
) -> Result<NutrientOutcomes> {
  Ok(NutrientOutcomes {
    protein: record_log(store, user_id, date, MetricKind::Protein, intake.protein).await?,
    carbohydrates: record_log(store, user_id, date, MetricKind::Carbohydrates, intake.carbohydrates).await?,
    fat: record_log(store, user_id, date, MetricKind::Fat, intake.fat).await?,
  })
}

/// Per-nutrient averages over a window
pub async fn compute_nutrient_averages<S: MetricStore + ?Sized>(
  store: &S,
  user_id: &str,
  window: TimeWindow,
) -> Result<NutrientAverages> {
  Ok(NutrientAverages {
    protein: window_mean(store, user_id, MetricKind::Protein, &window).await?,
    carbohydrates: window_mean(store, user_id, MetricKind::Carbohydrates, &window).await?,
    fat: window_mean(store, user_id, MetricKind::Fat, &window).await?,
  })
}

async fn window_mean<S: MetricStore + ?Sized>(
  store: &S,
  user_id: &str,
  kind: MetricKind,
  window: &TimeWindow,
) -> Result<Option<f64>> {
  let records = store
    .find_range(user_id, kind, Some(window.start), window.end)
    .await?;
  Ok(average(&records))
}
