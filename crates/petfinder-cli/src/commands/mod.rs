//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod user;

use clap::{Parser, Subcommand};

use petfinder_core::config::{AppConfig, CONFIG_DIR_VAR, ENV_VAR};
use petfinder_core::error::AppError;

use crate::output::OutputFormat;

/// PetFinder administration
#[derive(Debug, Parser)]
#[command(name = "petfinder-cli", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects `config/{env}.toml`)
    #[arg(short, long, env = ENV_VAR, default_value = "development")]
    pub env: String,

    /// Configuration directory
    #[arg(long, env = CONFIG_DIR_VAR, default_value = "config")]
    pub config_dir: String,

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
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, self).await,
            Commands::User(args) => user::execute(args, self).await,
            Commands::Config(args) => config::execute(args, self).await,
        }
    }

    /// Load configuration for the selected environment
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config_dir, &self.env)
    }
}
