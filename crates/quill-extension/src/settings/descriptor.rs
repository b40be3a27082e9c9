//! Setting descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettingKind {
    /// Any JSON number.
    Number,
    /// A boolean switch.
    Toggle,
    /// One string out of a fixed list.
    Select {
        /// Allowed values.
        options: Vec<String>,
    },
    /// Free-form string.
    Text,
}

impl SettingKind {
    /// Checks that `value` conforms to this kind.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match (self, value) {
            (Self::Number, Value::Number(_)) => Ok(()),
            (Self::Toggle, Value::Bool(_)) => Ok(()),
            (Self::Text, Value::String(_)) => Ok(()),
            (Self::Select { options }, Value::String(s)) => {
                if options.iter().any(|o| o == s) {
                    Ok(())
                } else {
                    Err(format!("'{s}' is not one of [{}]", options.join(", ")))
                }
            }
            (kind, other) => Err(format!("expected {}, got {other}", kind.name())),
        }
    }

    /// Short name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Toggle => "toggle",
            Self::Select { .. } => "select",
            Self::Text => "text",
        }
    }
}

/// A setting contributed by an extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDescriptor {
    /// Globally unique id, conventionally `<extension-prefix>.<key>`.
    pub id: String,
    /// Label shown in the settings UI.
    pub label: String,
    /// Declared type.
    #[serde(flatten)]
    pub kind: SettingKind,
    /// Value used until the user overrides it.
    pub default: Value,
    /// Help text.
    #[serde(default)]
    pub description: String,
    /// Settings UI section the entry is grouped under.
    #[serde(default)]
    pub section: String,
    /// Owning extension; assigned at registration.
    #[serde(default)]
    pub extension_id: String,
}

impl SettingDescriptor {
    fn new(id: &str, label: &str, kind: SettingKind, default: Value) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            default,
            description: String::new(),
            section: String::new(),
            extension_id: String::new(),
        }
    }

    /// A number setting.
    pub fn number(id: &str, label: &str, default: impl Into<serde_json::Number>) -> Self {
        Self::new(id, label, SettingKind::Number, Value::Number(default.into()))
    }

    /// A toggle setting.
    pub fn toggle(id: &str, label: &str, default: bool) -> Self {
        Self::new(id, label, SettingKind::Toggle, Value::Bool(default))
    }

    /// A select setting; `default` should be one of `options`.
    pub fn select(id: &str, label: &str, options: &[&str], default: &str) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        Self::new(
            id,
            label,
            SettingKind::Select { options },
            Value::String(default.to_string()),
        )
    }

    /// A text setting.
    pub fn text(id: &str, label: &str, default: &str) -> Self {
        Self::new(id, label, SettingKind::Text, Value::String(default.to_string()))
    }

    /// Sets the help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the settings UI section.
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }
}

/// Settings grouped under one UI section, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSection {
    /// Section title.
    pub section: String,
    /// Descriptors in the section.
    pub settings: Vec<SettingDescriptor>,
}
