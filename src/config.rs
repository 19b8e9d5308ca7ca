use anyhow::{ensure, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::console::DEFAULT_REFRESH_INTERVAL;
use crate::session::DEFAULT_POLL_INTERVAL;

/// Default config file (extension optional: toml, yaml, json)
pub const DEFAULT_CONFIG_PATH: &str = "config/loqa-session-monitor";

/// Environment overrides, e.g. `LOQA_SESSIONS__MONITOR__POLL_INTERVAL_MS=100`
pub const ENV_PREFIX: &str = "LOQA_SESSIONS";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    pub refresh_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load defaults, then the optional file at `path`, then environment
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default(
                "monitor.poll_interval_ms",
                DEFAULT_POLL_INTERVAL.as_millis() as i64,
            )?
            .set_default(
                "dashboard.refresh_interval_ms",
                DEFAULT_REFRESH_INTERVAL.as_millis() as i64,
            )?
            .set_default("logging.level", "info")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.monitor.poll_interval_ms > 0,
            "monitor.poll_interval_ms must be greater than zero"
        );
        ensure!(
            self.dashboard.refresh_interval_ms > 0,
            "dashboard.refresh_interval_ms must be greater than zero"
        );
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.dashboard.refresh_interval_ms)
    }

    /// Parsed log level; unrecognised names fall back to INFO
    pub fn log_level(&self) -> tracing::Level {
        self.logging.level.parse().unwrap_or(tracing::Level::INFO)
    }
}
