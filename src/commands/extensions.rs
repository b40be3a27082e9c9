//! Extension listing and reload.

use serde::Serialize;
use tabled::Tabled;

use quill_core::error::AppError;
use quill_extension::LifecycleManager;

use crate::output::{self, OutputFormat};

/// One row of the extension listing
#[derive(Debug, Serialize, Tabled)]
pub struct ExtensionRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Version")]
    pub version: String,
    #[tabled(rename = "Icon")]
    pub icon: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Last Error")]
    pub last_error: String,
}

/// List every extension in registration order
pub async fn list(manager: &LifecycleManager, format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<ExtensionRow> = manager
        .states()
        .await
        .into_iter()
        .map(|status| ExtensionRow {
            id: status.id,
            name: status.name,
            version: status.version,
            icon: status.icon.to_string(),
            state: status.state.to_string(),
            last_error: status.last_error.unwrap_or_default(),
        })
        .collect();
    output::print_list(&rows, format, "No extensions installed.");
    Ok(())
}

/// Reload one extension
pub async fn reload(manager: &LifecycleManager, id: &str) -> Result<(), AppError> {
    manager.reload(id).await?;
    output::print_success(&format!("Extension '{}' reloaded", id));
    Ok(())
}
