//! CLI command implementations.

pub mod config;
pub mod session;

use clap::{Args, Subcommand};

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    /// Session script (TOML).
    pub file: String,

    /// Skip confirmation prompts.
    #[arg(short, long)]
    pub yes: bool,

    /// Do not contact the backend, whatever the config says.
    #[arg(long)]
    pub offline: bool,

    /// Override the user id from the config and script.
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
