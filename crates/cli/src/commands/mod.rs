//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use userdesk_core::ValidationError;
use userdesk_web::config::{AppConfig, ConfigError};
use userdesk_web::db::{PgUserRepository, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to load or apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// User input was rejected.
    #[error("Invalid user: {0}")]
    Validation(#[from] ValidationError),

    /// Repository call failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Load configuration and open a single-purpose connection pool.
async fn connect() -> Result<(AppConfig, PgPool), CommandError> {
    let config = AppConfig::load()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(config.database.dsn.expose_secret()).await?;

    Ok((config, pool))
}

/// Repository over a fresh connection, using the configured query deadline.
async fn repository() -> Result<PgUserRepository, CommandError> {
    let (config, pool) = connect().await?;
    Ok(PgUserRepository::new(pool, config.database.query_timeout))
}

