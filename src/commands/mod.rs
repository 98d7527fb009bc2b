//! CLI command definitions and dispatch.

pub mod list;
pub mod mutate;
pub mod watch;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use catalog_client::credentials::Anonymous;
use catalog_client::{ApiClient, CredentialProvider, RestBackend, StaticToken};
use catalog_core::ClientResult;
use catalog_core::config::AppConfig;
use catalog_core::types::NotificationId;

use crate::output::OutputFormat;

/// Live notification client for the project catalog
#[derive(Debug, Parser)]
#[command(name = "catalog-notify", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bearer token for the catalog API (falls back to CATALOG_TOKEN)
    #[arg(short, long)]
    pub token: Option<String>,

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
    /// Follow live notifications until interrupted
    Watch(watch::WatchArgs),
    /// List the current notification snapshot
    List(list::ListArgs),
    /// Mark one notification as read
    MarkRead {
        /// Notification ID
        id: i64,
    },
    /// Mark every notification as read
    ReadAll,
    /// Delete one notification
    Delete {
        /// Notification ID
        id: i64,
    },
    /// Delete every notification
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> ClientResult<()> {
        let credentials = self.credentials(&config);

        match &self.command {
            Commands::Watch(args) => watch::execute(args, &config, credentials, self.format).await,
            Commands::List(args) => list::execute(args, &config, credentials, self.format).await,
            Commands::MarkRead { id } => {
                let op = mutate::Mutation::MarkRead(NotificationId::new(*id));
                mutate::execute(op, &config, credentials).await
            }
            Commands::ReadAll => {
                mutate::execute(mutate::Mutation::ReadAll, &config, credentials).await
            }
            Commands::Delete { id } => {
                let op = mutate::Mutation::Delete(NotificationId::new(*id));
                mutate::execute(op, &config, credentials).await
            }
            Commands::Clear { force } => {
                mutate::execute(mutate::Mutation::Clear { force: *force }, &config, credentials)
                    .await
            }
        }
    }

    /// Resolve the bearer token: flag, then `CATALOG_TOKEN`, then config.
    fn credentials(&self, config: &AppConfig) -> Arc<dyn CredentialProvider> {
        let token = self
            .token
            .clone()
            .or_else(|| std::env::var("CATALOG_TOKEN").ok())
            .or_else(|| config.api.token.clone());

        match token {
            Some(token) => Arc::new(StaticToken::new(token)),
            None => Arc::new(Anonymous),
        }
    }
}

/// Helper: build the REST backend from config and credentials
pub fn make_backend(
    config: &AppConfig,
    credentials: Arc<dyn CredentialProvider>,
) -> ClientResult<RestBackend> {
    let api = ApiClient::new(&config.api, credentials)?;
    Ok(RestBackend::new(api))
}
