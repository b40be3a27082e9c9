//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use quill_core::host::{Notification, NotificationLevel};

/// Output format selection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows in the selected format; `empty` is shown instead of an empty table
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat, empty: &str) {
    match format {
        OutputFormat::Table if items.is_empty() => println!("{}", empty),
        OutputFormat::Table => {
            let mut table = Table::new(items);
            table.with(Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a JSON value; bare strings are printed raw in table mode
pub fn print_value(value: &serde_json::Value, format: OutputFormat) {
    match (format, value) {
        (OutputFormat::Table, serde_json::Value::String(text)) => println!("{}", text),
        _ => {
            let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
            println!("{}", json);
        }
    }
}

/// Print notifications raised by extensions
pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        match notification.level {
            NotificationLevel::Information => print_info(&notification.message),
            NotificationLevel::Warning => print_warning(&notification.message),
            NotificationLevel::Error => print_error(&notification.message),
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print an informational message
fn print_info(msg: &str) {
    eprintln!("ℹ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    eprintln!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}
