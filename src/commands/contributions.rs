//! Views of the contribution registry.

use serde::Serialize;
use tabled::Tabled;

use quill_core::error::AppError;
use quill_extension::LifecycleManager;

use crate::output::{self, OutputFormat};

/// One status-bar item
#[derive(Debug, Serialize, Tabled)]
pub struct StatusBarRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Text")]
    pub text: String,
    #[tabled(rename = "Tooltip")]
    pub tooltip: String,
    #[tabled(rename = "Command")]
    pub command: String,
    #[tabled(rename = "Side")]
    pub alignment: String,
    #[tabled(rename = "Extension")]
    pub owner: String,
}

/// One sidebar panel
#[derive(Debug, Serialize, Tabled)]
pub struct PanelRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Icon")]
    pub icon: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Extension")]
    pub owner: String,
}

/// One editor toolbar button
#[derive(Debug, Serialize, Tabled)]
pub struct ButtonRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Icon")]
    pub icon: String,
    #[tabled(rename = "Command")]
    pub command: String,
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "Extension")]
    pub owner: String,
}

/// Show the status bar, left items first
pub async fn status_bar(manager: &LifecycleManager, format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<StatusBarRow> = manager
        .contributions()
        .list_status_bar_items()
        .await
        .into_iter()
        .map(|item| StatusBarRow {
            id: item.id,
            text: item.text,
            tooltip: item.tooltip.unwrap_or_default(),
            command: item.command.unwrap_or_default(),
            alignment: format!("{:?}", item.alignment).to_lowercase(),
            owner: item.owner,
        })
        .collect();
    output::print_list(&rows, format, "The status bar is empty.");
    Ok(())
}

/// List sidebar panels
pub async fn panels(manager: &LifecycleManager, format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<PanelRow> = manager
        .contributions()
        .list_sidebar_panels()
        .await
        .into_iter()
        .map(|panel| PanelRow {
            id: panel.id,
            icon: panel.icon.to_string(),
            label: panel.label,
            owner: panel.owner,
        })
        .collect();
    output::print_list(&rows, format, "No sidebar panels registered.");
    Ok(())
}

/// List editor buttons grouped by toolbar position
pub async fn buttons(manager: &LifecycleManager, format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<ButtonRow> = manager
        .contributions()
        .editor_buttons_by_position()
        .await
        .into_values()
        .flatten()
        .map(|button| ButtonRow {
            id: button.id,
            label: button.label,
            icon: button.icon.to_string(),
            command: button.command,
            position: format!("{:?}", button.position).to_lowercase(),
            owner: button.owner,
        })
        .collect();
    output::print_list(&rows, format, "No editor buttons registered.");
    Ok(())
}
