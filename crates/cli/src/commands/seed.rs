//! Seed the users table with sample rows for local development.
//!
//! Rows that collide with an existing email are skipped, so the command can
//! be re-run safely.

use userdesk_core::{NewUser, validate_user_input};
use userdesk_web::db::{RepositoryError, UserRepository};

use super::{CommandError, repository};

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: usize,
    pub skipped: usize,
}

/// Sample users `seed-1@example.com` through `seed-{count}@example.com`.
///
/// # Errors
///
/// Returns `CommandError::Validation` if a generated row is rejected.
pub fn sample_users(count: usize) -> Result<Vec<NewUser>, CommandError> {
    (1..=count)
        .map(|n| {
            let age = 18 + n % 60;
            validate_user_input(
                &format!("Seed User {n}"),
                &format!("seed-{n}@example.com"),
                &age.to_string(),
            )
            .map_err(CommandError::from)
        })
        .collect()
}

/// Insert `count` sample users.
///
/// # Errors
///
/// Returns `CommandError` if the connection fails or an insert fails for a
/// reason other than a duplicate email.
pub async fn users(count: usize) -> Result<SeedResult, CommandError> {
    let samples = sample_users(count)?;
    let repo = repository().await?;

    let mut result = SeedResult::default();
    for user in samples {
        match repo.create(user).await {
            Ok(_) => result.inserted += 1,
            Err(RepositoryError::DuplicateEmail) => result.skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!("Seeding complete!");
    tracing::info!("  Users inserted: {}", result.inserted);
    tracing::info!("  Users skipped (already exist): {}", result.skipped);

    repo.pool().close().await;
    Ok(result)
}
