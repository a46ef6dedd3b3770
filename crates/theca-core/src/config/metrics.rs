//! Request metrics configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings for request counters and the RPS window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Prefix for every exported metric name.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Trailing window the RPS gauge averages over, in seconds.
    #[serde(default = "default_window")]
    pub rps_window_seconds: u64,
    /// How often the window is collapsed into the gauge, in milliseconds.
    #[serde(default = "default_tick")]
    pub rps_tick_millis: u64,
}

impl MetricsConfig {
    /// The RPS window as a duration.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.rps_window_seconds)
    }

    /// The collapse interval as a duration.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.rps_tick_millis)
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.rps_window_seconds == 0 || self.rps_tick_millis == 0 {
            return Err(AppError::configuration(
                "RPS window and tick must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            rps_window_seconds: default_window(),
            rps_tick_millis: default_tick(),
        }
    }
}

fn default_namespace() -> String {
    "theca".to_string()
}

fn default_window() -> u64 {
    5
}

fn default_tick() -> u64 {
    1000
}
