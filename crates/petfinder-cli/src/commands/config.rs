//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use petfinder_core::error::AppError;
use petfinder_database::connection::mask_password;

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration with secrets masked
    Show,
    /// Validate the merged configuration
    Validate,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, cli: &Cli) -> Result<(), AppError> {
    let mut config = cli.load_config()?;

    match &args.command {
        ConfigCommand::Show => {
            config.auth.jwt_secret = "****".to_string();
            config.database.url = mask_password(&config.database.url);
            if !config.storage.s3.secret_key.is_empty() {
                config.storage.s3.secret_key = "****".to_string();
            }
            match cli.format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => {
                    output::print_kv("Environment", &cli.env);
                    output::print_kv(
                        "Server",
                        &format!("{}:{}", config.server.host, config.server.port),
                    );
                    output::print_kv("Public URL", &config.server.public_base_url);
                    output::print_kv("Database", &config.database.provider);
                    output::print_kv("Database URL", &config.database.url);
                    output::print_kv("Cache", &config.cache.provider);
                    output::print_kv("Storage", &config.storage.provider);
                    output::print_kv("JWT TTL (hours)", &config.auth.jwt_ttl_hours.to_string());
                    output::print_kv("Log level", &config.logging.level);
                }
            }
        }
        ConfigCommand::Validate => match config.validate() {
            Ok(warnings) => {
                output::print_success(&format!("Configuration '{}' is valid", cli.env));
                for warning in warnings {
                    output::print_warning(&warning);
                }
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
