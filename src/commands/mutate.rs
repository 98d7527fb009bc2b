//! Mutation commands: mark-read, read-all, delete, clear.
//!
//! Every operation goes through a [`NotificationSession`] so the same
//! precondition and remote-first rules apply as in the live watcher: the
//! backend is updated first and the local snapshot only mirrors a success.

use std::sync::Arc;

use catalog_client::CredentialProvider;
use catalog_core::ClientResult;
use catalog_core::config::AppConfig;
use catalog_core::error::ClientError;
use catalog_core::types::NotificationId;
use catalog_realtime::NotificationSession;

use crate::output;

/// A single gateway operation.
#[derive(Debug, Clone, Copy)]
pub enum Mutation {
    MarkRead(NotificationId),
    ReadAll,
    Delete(NotificationId),
    Clear {
        /// Skip the confirmation prompt
        force: bool,
    },
}

/// Execute a mutation command
pub async fn execute(
    mutation: Mutation,
    config: &AppConfig,
    credentials: Arc<dyn CredentialProvider>,
) -> ClientResult<()> {
    let backend = Arc::new(super::make_backend(config, Arc::clone(&credentials))?);
    let session = NotificationSession::new(config, backend, credentials);

    // Snapshot first; the gateway checks its preconditions locally.
    session.refresh().await?;

    match mutation {
        Mutation::MarkRead(id) => match session.notification(id) {
            None => output::print_warning(&format!("Notification {id} not found")),
            Some(n) if n.is_read => {
                output::print_warning(&format!("Notification {id} is already read"))
            }
            Some(_) => {
                session.mark_as_read(id).await?;
                output::print_success(&format!("Notification {id} marked as read"));
            }
        },
        Mutation::ReadAll => {
            let unread = session.unread_count();
            session.mark_all_as_read().await?;
            output::print_success(&format!("Marked {unread} notifications as read"));
        }
        Mutation::Delete(id) => {
            if session.notification(id).is_none() {
                output::print_warning(&format!("Notification {id} not found"));
            } else {
                session.delete_notification(id).await?;
                output::print_success(&format!("Notification {id} deleted"));
            }
        }
        Mutation::Clear { force } => {
            let total = session.counts().total_count;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete all {total} notifications?"))
                    .default(false)
                    .interact()
                    .map_err(|e| ClientError::configuration(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    session.shutdown().await;
                    return Ok(());
                }
            }

            session.clear_all_notifications().await?;
            output::print_success(&format!("Deleted {total} notifications"));
        }
    }

    session.shutdown().await;
    Ok(())
}
