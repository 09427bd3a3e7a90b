//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! # Apply migrations from the default directory
//! userdesk-cli migrate
//!
//! # Apply migrations from another directory
//! userdesk-cli migrate --dir path/to/migrations
//! ```
//!
//! The connection string comes from the same configuration as the server
//! (`config.yaml`, `.env`, `DATABASE_DSN`).

use std::path::Path;

use sqlx::migrate::Migrator;

use super::{CommandError, connect};

/// Migration directory relative to the workspace root.
pub const DEFAULT_DIR: &str = "crates/web/migrations";

/// Apply all pending migrations found in `dir`.
///
/// # Errors
///
/// Returns `CommandError` if configuration, connection or a migration fails.
pub async fn run(dir: &Path) -> Result<(), CommandError> {
    let (_, pool) = connect().await?;

    tracing::info!(dir = %dir.display(), "Running migrations...");
    let migrator = Migrator::new(dir).await?;
    migrator.run(&pool).await?;

    tracing::info!(
        count = migrator.iter().count(),
        "Migrations complete!"
    );
    pool.close().await;
    Ok(())
}
