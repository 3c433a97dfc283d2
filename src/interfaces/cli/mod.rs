//! CLI interface module
//!
//! This module provides command-line interface functionality for qrlink.
//! Link and stats commands talk to the database directly through the
//! same services the admin API uses.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands, LinkCommands};
use crate::config::StaticConfig;
use crate::errors::QrlinkError;
use crate::services::{LinkService, StatsService};
use crate::storage::{SeaOrmStorage, StorageFactory};
use commands::{add_link, config_management, list_links, remove_link, show_stats, update_link};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<QrlinkError> for CliError {
    fn from(err: QrlinkError) -> Self {
        match err {
            QrlinkError::Validation(msg) => CliError::ParseError(msg),
            QrlinkError::DatabaseConfig(_)
            | QrlinkError::DatabaseConnection(_)
            | QrlinkError::DatabaseOperation(_) => CliError::StorageError(err.message().to_string()),
            other => CliError::CommandError(other.format_simple()),
        }
    }
}

async fn open_storage(config: &StaticConfig) -> Result<Arc<SeaOrmStorage>, CliError> {
    StorageFactory::create_with(&config.database)
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))
}

/// Run a CLI command from clap-parsed input
///
/// `Serve` is handled by the caller.
pub async fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        // Generate doesn't need a database connection
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_management::config_generate(output_path, force).await,

        Commands::Link { action } => {
            let storage = open_storage(config).await?;
            let links = LinkService::new(storage.clone(), storage);

            match action {
                LinkCommands::Add {
                    slug,
                    destination,
                    description,
                } => add_link(&links, slug, destination, description).await,
                LinkCommands::List => list_links(&links).await,
                LinkCommands::Update {
                    slug,
                    destination,
                    new_slug,
                    description,
                } => update_link(&links, slug, new_slug, destination, description).await,
                LinkCommands::Remove { slug } => remove_link(&links, slug).await,
            }
        }

        Commands::Stats { slug } => {
            let storage = open_storage(config).await?;
            let links = LinkService::new(storage.clone(), storage.clone());
            let stats = StatsService::new(storage.clone(), storage);
            show_stats(&links, &stats, slug).await
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),
    }
}
