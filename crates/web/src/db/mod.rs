//! Database operations for the users store.
//!
//! ## Tables
//!
//! - `users` - id (identity), name, email (unique), age
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p userdesk-cli -- migrate
//! ```
//!
//! Store-specific errors never leave this module: handlers only see
//! [`RepositoryError`].

pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use userdesk_core::{NewUser, User, UserId};

use crate::config::DatabaseConfig;

pub use users::PgUserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The query did not finish before the deadline.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Another user already has this email.
    #[error("email already exists")]
    DuplicateEmail,
}

/// Persistence operations for users.
///
/// Implementations must be cheap to share across requests; the Postgres
/// implementation only holds a pool handle.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users ordered by id ascending. An out-of-range page is an empty vec.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, RepositoryError>;

    /// Fetch one user.
    ///
    /// Returns `RepositoryError::NotFound` when no row has this id.
    async fn get(&self, id: UserId) -> Result<User, RepositoryError>;

    /// Insert a user and return it with the store-assigned id.
    ///
    /// Returns `RepositoryError::DuplicateEmail` on an email conflict.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Replace name, email and age of an existing user.
    ///
    /// Returns `RepositoryError::NotFound` when no row was affected and
    /// `RepositoryError::DuplicateEmail` on an email conflict.
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;

    /// Hard-delete a user.
    ///
    /// Returns `RepositoryError::NotFound` when no row was affected.
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;

    /// Check that the store answers.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool from configuration.
///
/// Connects eagerly so an unreachable store fails startup.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(Duration::from_secs(60))
        .acquire_timeout(Duration::from_secs(10))
        .connect(config.dsn.expose_secret())
        .await
}
