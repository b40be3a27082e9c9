//! Quill extension host entry point.
//!
//! Boots the runtime with the bundled extensions, runs one CLI command
//! against it, then shuts every extension down.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use quill_core::config::AppConfig;
use quill_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let base = cli.config.as_deref().unwrap_or("config/default");
    AppConfig::load_from(base, &cli.env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
