//! Output formatting for the notification CLI.

use serde::Serialize;
use tabled::{Table, Tabled};

use catalog_entity::notification::NotificationCount;
use catalog_realtime::ConnectionStatus;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print notification rows in the selected format.
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No notifications.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

fn counts_line(counts: &NotificationCount) -> String {
    format!(
        "{} unread of {} total",
        counts.unread_count, counts.total_count
    )
}

/// Print the unread/total summary shown under tables and on watch updates.
pub fn print_counts(counts: &NotificationCount) {
    println!("  {}", counts_line(counts));
}

/// Print a connection status transition while watching.
pub fn print_connection(status: ConnectionStatus) {
    println!("-- connection {status} --");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}
