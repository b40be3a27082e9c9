//! CLI command definitions and dispatch.

pub mod contributions;
pub mod extensions;
pub mod invoke;
pub mod settings;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use quill_core::config::AppConfig;
use quill_core::error::AppError;
use quill_core::host::{MockHostServices, RecordingNotifier};
use quill_host::HostRuntime;

use crate::output::{self, OutputFormat};

/// Quill extension host
#[derive(Debug, Parser)]
#[command(name = "quill-host", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long)]
    pub config: Option<String>,

    /// Environment overlay read from `config/{env}`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List installed extensions and their states
    Extensions,
    /// List registered commands
    Commands,
    /// Show status-bar items
    StatusBar,
    /// List sidebar panels
    Panels,
    /// List editor toolbar buttons
    Buttons,
    /// Show settings grouped by section
    Settings,
    /// Change a setting
    Set {
        /// Setting id, e.g. `live-server.port`
        id: String,
        /// New value as JSON; anything unparsable is taken as a string
        value: String,
    },
    /// Execute a command
    Run {
        /// Command id, e.g. `lorem.generate`
        command: String,
        /// Arguments as JSON; anything unparsable is taken as a string
        args: Vec<String>,
    },
    /// Deactivate and activate an extension again
    Reload {
        /// Extension id
        id: String,
    },
}

impl Cli {
    /// Boot the runtime, execute the command, and shut down
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let notifier = Arc::new(RecordingNotifier::new());
        let runtime = HostRuntime::with_settings_file(
            &config,
            notifier.clone(),
            Arc::new(MockHostServices::new()),
        )
        .await?;

        let report = runtime.start(&config).await;
        if !report.failed.is_empty() {
            output::print_warning(&format!(
                "{} extension(s) failed to activate: {}",
                report.failed.len(),
                report.failed.join(", ")
            ));
        }
        output::print_notifications(&notifier.drain());

        let manager = runtime.manager();
        let result = match &self.command {
            Commands::Extensions => extensions::list(manager, self.format).await,
            Commands::Reload { id } => extensions::reload(manager, id).await,
            Commands::Commands => invoke::list(manager, self.format),
            Commands::Run { command, args } => {
                invoke::run(manager, command, args, self.format).await
            }
            Commands::StatusBar => contributions::status_bar(manager, self.format).await,
            Commands::Panels => contributions::panels(manager, self.format).await,
            Commands::Buttons => contributions::buttons(manager, self.format).await,
            Commands::Settings => settings::list(manager, self.format).await,
            Commands::Set { id, value } => settings::set(manager, id, value).await,
        };
        output::print_notifications(&notifier.drain());

        runtime.shutdown().await;
        output::print_notifications(&notifier.drain());

        result
    }
}

/// Helper: parse a CLI argument as JSON, falling back to a plain string
pub fn parse_json_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
