pub mod constants;
pub mod types;

pub use types::*;

use crate::core::ConfigError;
use anyhow::{Context, Result};
use config::{Config as ConfigLoader, Environment, File};
use std::path::Path;

impl Config {
    /// Load configuration from an optional TOML file with `VANE__` environment overrides
    ///
    /// Every option has a default, so a missing file (or `None`) yields the
    /// defaults plus whatever the environment sets, e.g.
    /// `VANE__RISK__POSITION_LIMIT=50`.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = ConfigLoader::builder();

        if let Some(path) = path {
            let path = path.as_ref();
            if !path.exists() {
                anyhow::bail!("Configuration file {} does not exist", path.display());
            }
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("VANE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let cfg: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration values
    ///
    /// Run at startup so bad limits fail fast instead of mid-loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.risk.limits().validate()?;

        if self.queue.capacity == 0 {
            return Err(ConfigError::ZeroCount {
                field: "queue.capacity",
            });
        }
        if self.engine.batch_size == 0 {
            return Err(ConfigError::ZeroCount {
                field: "engine.batch_size",
            });
        }
        if self.engine.dedup_window == 0 {
            return Err(ConfigError::ZeroCount {
                field: "engine.dedup_window",
            });
        }
        if self.engine.order_timeout_ms == 0 {
            return Err(ConfigError::ZeroCount {
                field: "engine.order_timeout_ms",
            });
        }
        if !(self.engine.spread_threshold.is_finite() && self.engine.spread_threshold >= 0.0) {
            return Err(ConfigError::Negative {
                field: "engine.spread_threshold",
                value: self.engine.spread_threshold,
            });
        }
        if !(self.engine.order_size.is_finite() && self.engine.order_size > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "engine.order_size",
                value: self.engine.order_size,
            });
        }
        if self.feed.interval_us == 0 {
            return Err(ConfigError::ZeroCount {
                field: "feed.interval_us",
            });
        }
        if self.feed.symbol.is_empty() {
            return Err(ConfigError::Empty {
                field: "feed.symbol",
            });
        }

        Ok(())
    }
}
