//! Userdesk CLI - Database migrations and user management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! userdesk-cli migrate
//!
//! # Create a user
//! userdesk-cli user add -n "Ada Lovelace" -e ada@example.com -a 36
//!
//! # Delete a user
//! userdesk-cli user delete 42
//!
//! # Insert sample users
//! userdesk-cli seed --count 50
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user add` / `user delete` - Manage users
//! - `seed` - Seed database with sample users

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use userdesk_core::UserId;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "userdesk-cli")]
#[command(author, version, about = "Userdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        /// Migration directory
        #[arg(short, long, default_value = commands::migrate::DEFAULT_DIR)]
        dir: PathBuf,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Insert sample users
    Seed {
        /// Number of users to generate
        #[arg(short, long, default_value_t = 25)]
        count: usize,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (must be unique)
        #[arg(short, long)]
        email: String,

        /// Age in years (positive integer)
        #[arg(short, long)]
        age: String,
    },
    /// Delete a user by id
    Delete {
        /// User id
        id: UserId,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Migrate { dir } => commands::migrate::run(&dir).await?,
        Commands::User { action } => match action {
            UserAction::Add { name, email, age } => {
                commands::user::add(&name, &email, &age).await?;
            }
            UserAction::Delete { id } => commands::user::delete(id).await?,
        },
        Commands::Seed { count } => {
            commands::seed::users(count).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_delete() {
        let cli = Cli::try_parse_from(["userdesk-cli", "user", "delete", "42"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::User {
                action: UserAction::Delete { id }
            }) if id == UserId::new(42)
        ));
    }

    #[test]
    fn test_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["userdesk-cli", "user", "delete", "abc"]).is_err());
    }

    #[test]
    fn test_migrate_default_dir() {
        let cli = Cli::try_parse_from(["userdesk-cli", "migrate"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Migrate { dir }) if dir == PathBuf::from(commands::migrate::DEFAULT_DIR)
        ));
    }
}
