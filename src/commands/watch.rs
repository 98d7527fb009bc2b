//! Live notification watcher.

use std::sync::Arc;

use clap::Args;
use tokio::sync::broadcast::error::RecvError;

use catalog_client::CredentialProvider;
use catalog_core::ClientResult;
use catalog_core::config::AppConfig;
use catalog_entity::notification::{Notification, NotificationKind};
use catalog_realtime::{NotificationSession, SessionEvent};

use crate::output::{self, OutputFormat};

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only show notifications of this kind (comment, approval, ...)
    #[arg(short, long)]
    pub kind: Option<NotificationKind>,
}

/// Execute the watch command
pub async fn execute(
    args: &WatchArgs,
    config: &AppConfig,
    credentials: Arc<dyn CredentialProvider>,
    format: OutputFormat,
) -> ClientResult<()> {
    let backend = Arc::new(super::make_backend(config, Arc::clone(&credentials))?);
    let session = NotificationSession::new(config, backend, credentials);

    // Subscribe before starting so no early event is missed.
    let mut events = session.subscribe_events();

    match session.start().await {
        Ok(()) => output::print_counts(&session.counts()),
        Err(e) => {
            // The subscriber keeps retrying; a failed first snapshot is
            // caught up on connect.
            output::print_warning(&format!("Initial snapshot failed: {e}"));
        }
    }

    println!("Watching for notifications (Ctrl-C to stop)...");

    loop {
        tokio::select! {
            _ = shutdown_signal() => break,
            event = events.recv() => match event {
                Ok(SessionEvent::Received(notification)) => {
                    if let Some(kind) = args.kind {
                        if notification.notification_type != kind {
                            continue;
                        }
                    }
                    print_notification(&notification, format);
                }
                Ok(SessionEvent::StatusChanged(status)) => {
                    output::print_connection(status);
                }
                Ok(SessionEvent::CountsChanged(counts)) => {
                    if format == OutputFormat::Table {
                        output::print_counts(&counts);
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    output::print_warning(&format!("{missed} events dropped; counters stay accurate"));
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.shutdown().await;
    output::print_success("Session closed");
    Ok(())
}

fn print_notification(notification: &Notification, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!(
                "[{}] {:<9} #{} {}",
                notification.created_at.format("%H:%M:%S"),
                notification.notification_type.label(),
                notification.id,
                notification.message,
            );
        }
        OutputFormat::Json => {
            match serde_json::to_string(notification) {
                Ok(json) => println!("{json}"),
                Err(e) => output::print_error(&format!("Serialization error: {e}")),
            }
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
