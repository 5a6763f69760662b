use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::AppConfig;
use crate::error::ProgressError;
use crate::store::SqliteMetricStore;

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool
#[derive(Debug, Clone)]
pub struct AppState {
  pub db: DbPool,
}

impl AppState {
  /// Record store over this state's pool
  pub fn store(&self) -> SqliteMetricStore {
    SqliteMetricStore::new(self.db.clone())
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &AppConfig) -> Result<DbPool, ProgressError> {
  info!(url = %config.database_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&config.database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}
