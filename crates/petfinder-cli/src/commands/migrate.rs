//! Database migration management commands.

use clap::{Args, Subcommand};

use petfinder_core::error::AppError;
use petfinder_database::DatabasePool;
use petfinder_database::migration::{migration_status, run_migrations};

use super::Cli;
use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show which migrations are applied
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    if config.database.is_memory() {
        output::print_warning("database.provider is memory; nothing to migrate");
        return Ok(());
    }
    let pool = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            for (version, description, applied) in migration_status(pool.pool()).await? {
                let mark = if applied { "applied" } else { "pending" };
                println!("  {version:>4}  {description:<40} {mark}");
            }
        }
    }

    pool.close().await;
    Ok(())
}
