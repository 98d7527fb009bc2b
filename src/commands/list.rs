//! Snapshot listing command.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use catalog_client::{CredentialProvider, NotificationBackend};
use catalog_core::ClientResult;
use catalog_core::config::AppConfig;
use catalog_entity::notification::{NotificationCount, model};

use crate::output::{self, OutputFormat};

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show unread notifications
    #[arg(short, long)]
    pub unread: bool,
}

/// Notification display row
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// ID
    id: i64,
    /// Kind
    kind: String,
    /// Read marker
    read: String,
    /// Created timestamp
    created: String,
    /// Message
    message: String,
}

/// Execute the list command
pub async fn execute(
    args: &ListArgs,
    config: &AppConfig,
    credentials: Arc<dyn CredentialProvider>,
    format: OutputFormat,
) -> ClientResult<()> {
    let backend = super::make_backend(config, credentials)?;

    let mut notifications = backend.fetch_all().await?;
    model::sort_newest_first(&mut notifications);

    let total = notifications.len();
    let unread = notifications.iter().filter(|n| n.is_unread()).count();

    if args.unread {
        notifications.retain(|n| n.is_unread());
    }

    let rows: Vec<NotificationRow> = notifications
        .iter()
        .map(|n| NotificationRow {
            id: n.id.value(),
            kind: n.notification_type.label().to_string(),
            read: if n.is_read { "yes" } else { "no" }.to_string(),
            created: n.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            message: n.message.clone(),
        })
        .collect();

    output::print_list(&rows, format);

    if format == OutputFormat::Table {
        output::print_counts(&NotificationCount::new(unread, total));
    }

    Ok(())
}
