//! Command listing and execution.

use serde::Serialize;
use tabled::Tabled;

use quill_core::error::AppError;
use quill_extension::LifecycleManager;

use crate::output::{self, OutputFormat};

/// One row of the command listing
#[derive(Debug, Serialize, Tabled)]
pub struct CommandRow {
    #[tabled(rename = "Command")]
    pub id: String,
    #[tabled(rename = "Extension")]
    pub owner: String,
}

/// List registered commands
pub fn list(manager: &LifecycleManager, format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<CommandRow> = manager
        .commands()
        .list_commands()
        .into_iter()
        .map(|info| CommandRow {
            id: info.id,
            owner: info.owner,
        })
        .collect();
    output::print_list(&rows, format, "No commands registered.");
    Ok(())
}

/// Execute a command and print its result
pub async fn run(
    manager: &LifecycleManager,
    command: &str,
    args: &[String],
    format: OutputFormat,
) -> Result<(), AppError> {
    let args = args.iter().map(|raw| super::parse_json_arg(raw)).collect();
    let result = manager.execute_command(command, args).await?;
    output::print_value(&result, format);
    Ok(())
}
