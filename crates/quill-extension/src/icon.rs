//! Closed set of symbolic icons available to manifests and contributions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Icon identifiers understood by the host UI.
///
/// Names are resolved once, when a manifest or contribution is registered.
/// Anything outside this set becomes [`Icon::Extension`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    /// Generic extension icon; the fallback.
    #[default]
    Extension,
    Radio,
    Wand,
    FileText,
    Send,
    Play,
    Stop,
    Settings,
    Code,
    Globe,
    Terminal,
    GitBranch,
    Search,
    Files,
    Zap,
}

impl Icon {
    /// Every known icon, in display order.
    pub const ALL: [Icon; 15] = [
        Icon::Extension,
        Icon::Radio,
        Icon::Wand,
        Icon::FileText,
        Icon::Send,
        Icon::Play,
        Icon::Stop,
        Icon::Settings,
        Icon::Code,
        Icon::Globe,
        Icon::Terminal,
        Icon::GitBranch,
        Icon::Search,
        Icon::Files,
        Icon::Zap,
    ];

    /// Symbolic name of the icon.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Radio => "radio",
            Self::Wand => "wand",
            Self::FileText => "file-text",
            Self::Send => "send",
            Self::Play => "play",
            Self::Stop => "stop",
            Self::Settings => "settings",
            Self::Code => "code",
            Self::Globe => "globe",
            Self::Terminal => "terminal",
            Self::GitBranch => "git-branch",
            Self::Search => "search",
            Self::Files => "files",
            Self::Zap => "zap",
        }
    }

    /// Resolves a symbolic name, falling back to [`Icon::Extension`].
    pub fn resolve(name: &str) -> Self {
        match name.parse() {
            Ok(icon) => icon,
            Err(UnknownIcon(name)) => {
                warn!(icon = %name, "Unknown icon name, using default");
                Self::Extension
            }
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Icon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::resolve(&name))
    }
}

/// Returned when parsing a name outside the icon set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIcon(pub String);

impl FromStr for Icon {
    type Err = UnknownIcon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|icon| icon.name() == normalized)
            .ok_or_else(|| UnknownIcon(s.to_string()))
    }
}
