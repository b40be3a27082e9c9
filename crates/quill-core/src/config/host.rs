//! Host process configuration.

use serde::{Deserialize, Serialize};

/// Settings for the host process that embeds the extension runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Project directory opened at startup, if any.
    #[serde(default)]
    pub workspace_root: Option<String>,
    /// File holding persisted user setting overrides (flat JSON object).
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            settings_file: default_settings_file(),
        }
    }
}

fn default_settings_file() -> String {
    "data/settings.json".to_string()
}
