//! Prelude for extension authors.

pub use async_trait::async_trait;
pub use serde_json::{Value, json};

pub use crate::commands::CommandHandler;
pub use crate::context::{ExtensionContext, Window};
pub use crate::contributions::{
    EditorButtonOptions, PanelOptions, RenderFactory, StatusBarAlignment, StatusBarItemOptions,
    ToolbarPosition,
};
pub use crate::error::{ExtensionError, ExtensionResult};
pub use crate::icon::Icon;
pub use crate::manifest::ExtensionManifest;
pub use crate::registry::{Extension, ExtensionModule};
pub use crate::settings::{SettingDescriptor, SettingsSnapshot};
pub use crate::traits::FnExtension;
