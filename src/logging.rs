//! Tracing subscriber setup

use std::env;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init_logging(config: &AppConfig) {
  let env_filter = env::var("RUST_LOG")
    .map_or_else(|_| EnvFilter::new(&config.log_level), EnvFilter::new)
    .add_directive(
      "sqlx=warn"
        .parse()
        .unwrap_or_else(|_| tracing::Level::WARN.into()),
    );

  let _ = tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_target(true))
    .try_init();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_init_is_idempotent() {
    let config = AppConfig::default();
    init_logging(&config);
    init_logging(&config);
    tracing::info!("logging initialized twice without panicking");
  }
}
