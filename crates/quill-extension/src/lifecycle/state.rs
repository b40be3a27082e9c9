//! Extension states and status snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::icon::Icon;

/// Where an extension is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionState {
    Registered,
    Activating,
    Active,
    Failed,
    Deactivating,
    Deactivated,
}

impl ExtensionState {
    /// Whether `activate` may start from this state.
    pub fn can_activate(self) -> bool {
        matches!(self, Self::Registered | Self::Failed | Self::Deactivated)
    }

    /// Whether an activate or deactivate call is in flight.
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Activating | Self::Deactivating)
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Activating => "activating",
            Self::Active => "active",
            Self::Failed => "failed",
            Self::Deactivating => "deactivating",
            Self::Deactivated => "deactivated",
        }
    }
}

impl std::fmt::Display for ExtensionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of one extension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionStatus {
    /// Extension id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Version string.
    pub version: String,
    /// Manifest icon.
    pub icon: Icon,
    /// Current state.
    pub state: ExtensionState,
    /// Error of the most recent failed activation.
    pub last_error: Option<String>,
    /// Start of the current activation, while active.
    pub activated_at: Option<DateTime<Utc>>,
}
