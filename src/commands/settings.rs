//! Settings listing and updates.

use serde::Serialize;
use tabled::Tabled;

use quill_core::error::AppError;
use quill_extension::LifecycleManager;

use crate::output::{self, OutputFormat};

/// One setting with its current value
#[derive(Debug, Serialize, Tabled)]
pub struct SettingRow {
    #[tabled(rename = "Section")]
    pub section: String,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Default")]
    pub default: String,
}

/// Show every setting grouped by section
pub async fn list(manager: &LifecycleManager, format: OutputFormat) -> Result<(), AppError> {
    let values = manager.settings().get_all().await;
    let rows: Vec<SettingRow> = manager
        .contributions()
        .list_settings_by_section()
        .await
        .into_iter()
        .flat_map(|section| {
            let name = section.section;
            section
                .settings
                .into_iter()
                .map(move |descriptor| (name.clone(), descriptor))
        })
        .map(|(section, descriptor)| SettingRow {
            section,
            value: values
                .get(&descriptor.id)
                .map(ToString::to_string)
                .unwrap_or_default(),
            default: descriptor.default.to_string(),
            kind: descriptor.kind.name().to_string(),
            id: descriptor.id,
        })
        .collect();
    output::print_list(&rows, format, "No settings declared.");
    Ok(())
}

/// Change one setting; the new value is persisted
pub async fn set(manager: &LifecycleManager, id: &str, raw: &str) -> Result<(), AppError> {
    let value = super::parse_json_arg(raw);
    manager.settings().set(id, value.clone()).await?;
    output::print_success(&format!("{} = {}", id, value));
    Ok(())
}
