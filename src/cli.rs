//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for qrlink using clap's derive macros.

use clap::{Parser, Subcommand};

/// qrlink - QR code redirects with scan analytics
#[derive(Parser)]
#[command(name = "qrlink")]
#[command(version)]
#[command(about = "QR code redirect service with scan analytics", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (same as running without a command)
    Serve,

    /// Manage QR links
    Link {
        #[command(subcommand)]
        action: LinkCommands,
    },

    /// Show scan statistics for a link
    Stats {
        /// Link slug
        slug: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Link management commands
#[derive(Subcommand)]
pub enum LinkCommands {
    /// Add a link
    Add {
        /// Slug used in the QR code URL (letters, digits and '-')
        slug: String,

        /// Destination URL (http or https)
        destination: String,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },

    /// List all links with their scan totals
    List,

    /// Update a link
    Update {
        /// Current slug
        slug: String,

        /// New destination URL
        #[arg(long)]
        destination: Option<String>,

        /// New slug
        #[arg(long = "new-slug")]
        new_slug: Option<String>,

        /// New description (empty string removes it)
        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a link (its scan history is kept)
    Remove {
        /// Slug to remove
        slug: String,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_link_update() {
        let cli = Cli::try_parse_from([
            "qrlink",
            "-c",
            "custom.toml",
            "link",
            "update",
            "promo",
            "--new-slug",
            "promo-2025",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        match cli.command {
            Some(Commands::Link {
                action:
                    LinkCommands::Update {
                        slug,
                        new_slug,
                        destination,
                        ..
                    },
            }) => {
                assert_eq!(slug, "promo");
                assert_eq!(new_slug.as_deref(), Some("promo-2025"));
                assert!(destination.is_none());
            }
            _ => panic!("expected link update"),
        }
    }

    #[test]
    fn test_no_command_means_server() {
        let cli = Cli::try_parse_from(["qrlink"]).unwrap();
        assert!(cli.command.is_none());
    }
}
