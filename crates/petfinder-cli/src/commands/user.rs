//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use petfinder_auth::{JwtEncoder, PasswordHasher, PasswordValidator};
use petfinder_core::error::AppError;
use petfinder_core::types::pagination::PageRequest;
use petfinder_database::Repositories;
use petfinder_entity::user::User;
use petfinder_service::{AccountService, RegisterInput};

use super::Cli;
use crate::output;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List registered users
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Users per page
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Create a user (prompts for the password)
    Create {
        /// Display name
        #[arg(long)]
        name: String,
        /// Login email
        #[arg(long)]
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    phone: String,
    city: String,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone().unwrap_or_default(),
            city: u.city.clone().unwrap_or_default(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(args: &UserArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let repos = Repositories::connect(&config.database).await?;
    let accounts = AccountService::new(
        repos.users.clone(),
        PasswordHasher::new(),
        PasswordValidator::new(&config.auth),
        JwtEncoder::new(&config.auth),
    );

    let result = match &args.command {
        UserCommand::List { page, per_page } => {
            let users = accounts
                .list_users(&PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<UserRow> = users.items.iter().map(UserRow::from).collect();
            output::print_list(&rows, cli.format);
            println!(
                "Page {} of {} ({} users)",
                users.page, users.total_pages, users.total_items
            );
            Ok(())
        }
        UserCommand::Create { name, email } => {
            let password = dialoguer::Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

            let user = accounts
                .register(RegisterInput {
                    name: name.clone(),
                    email: email.clone(),
                    confirm_password: password.clone(),
                    password,
                })
                .await?;

            output::print_success(&format!("User '{}' created", user.email));
            output::print_kv("ID", &user.id.to_string());
            Ok(())
        }
    };

    repos.close().await;
    result
}
