//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! userdesk-cli user add -n "Ada Lovelace" -e ada@example.com -a 36
//! userdesk-cli user delete 42
//! ```

use userdesk_core::{User, UserId, validate_user_input};
use userdesk_web::db::UserRepository;

use super::{CommandError, repository};

/// Create a user with the same validation the web form applies.
///
/// # Errors
///
/// Returns `CommandError::Validation` for rejected input and
/// `CommandError::Repository` for store failures, including a duplicate email.
pub async fn add(name: &str, email: &str, age: &str) -> Result<User, CommandError> {
    let new_user = validate_user_input(name, email, age)?;

    let repo = repository().await?;
    let user = repo.create(new_user).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    repo.pool().close().await;
    Ok(user)
}

/// Hard-delete a user.
///
/// # Errors
///
/// Returns `CommandError::Repository` if the user does not exist or the store
/// fails.
pub async fn delete(id: UserId) -> Result<(), CommandError> {
    let repo = repository().await?;
    repo.delete(id).await?;

    tracing::info!(user_id = %id, "User deleted");
    repo.pool().close().await;
    Ok(())
}
