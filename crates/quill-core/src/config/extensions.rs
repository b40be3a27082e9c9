//! Extension runtime configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const MIN_DEACTIVATE_TIMEOUT_SECONDS: u64 = 1;

/// Extension runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    /// Whether to activate every registered extension on startup.
    #[serde(default = "default_true")]
    pub auto_activate: bool,
    /// Extension ids that are registered but never activated at startup.
    #[serde(default)]
    pub disabled: Vec<String>,
    /// How long deactivation waits for an extension's own cleanup before
    /// sweeping its contributions anyway. Values below one second are
    /// raised to one.
    #[serde(default = "default_deactivate_timeout")]
    pub deactivate_timeout_seconds: u64,
}

impl ExtensionsConfig {
    /// Returns the deactivation grace period, at least one second.
    pub fn deactivate_timeout(&self) -> Duration {
        Duration::from_secs(self.deactivate_timeout_seconds.max(MIN_DEACTIVATE_TIMEOUT_SECONDS))
    }
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            auto_activate: true,
            disabled: Vec::new(),
            deactivate_timeout_seconds: default_deactivate_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_deactivate_timeout() -> u64 {
    5
}
