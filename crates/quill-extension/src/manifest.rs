//! Extension manifests: static identity and metadata.

use serde::{Deserialize, Serialize};

use crate::icon::Icon;

/// Identity and metadata of an extension. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionManifest {
    /// Globally unique, stable identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Version string.
    pub version: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Author or maintainer.
    #[serde(default)]
    pub author: String,
    /// Icon shown in extension listings.
    #[serde(default)]
    pub icon: Icon,
    /// Documentation text, opaque to the runtime.
    #[serde(default)]
    pub readme: String,
}

impl ExtensionManifest {
    /// Creates a manifest with the required fields; the rest default to empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            description: String::new(),
            author: String::new(),
            icon: Icon::Extension,
            readme: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Resolves and sets the icon from its symbolic name.
    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Icon::resolve(icon);
        self
    }

    /// Sets the readme text.
    pub fn with_readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = readme.into();
        self
    }
}
