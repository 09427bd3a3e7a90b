//! Integration tests for Userdesk.
//!
//! # Running Tests
//!
//! ```bash
//! # Database tests need a migrated PostgreSQL database
//! DATABASE_DSN=postgres://localhost/userdesk_test \
//!     cargo test -p userdesk-integration-tests -- --ignored
//!
//! # HTTP tests additionally need the server running
//! cargo run -p userdesk-web
//! USERDESK_BASE_URL=http://localhost:8080 \
//!     cargo test -p userdesk-integration-tests --test users_http -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `user_repository` - `PgUserRepository` against a real database
//! - `users_http` - the running server over HTTP

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use uuid::Uuid;

use userdesk_web::db::PgUserRepository;

/// Base URL of a running server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("USERDESK_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// HTTP client that does not follow redirects, so 303s can be asserted.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn http_client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Email address that no other test run will use.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.com", Uuid::new_v4().simple())
}

/// Directory holding the web crate's migrations.
#[must_use]
pub fn migrations_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../web/migrations")
}

/// Connect to `DATABASE_DSN` and apply migrations.
///
/// # Panics
///
/// Panics if the variable is unset, the database is unreachable or a
/// migration fails.
pub async fn migrated_pool() -> PgPool {
    let dsn = std::env::var("DATABASE_DSN").expect("DATABASE_DSN must be set");
    let pool = PgPool::connect(&dsn)
        .await
        .expect("Failed to connect to database");

    Migrator::new(migrations_dir())
        .await
        .expect("Failed to load migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Repository over a migrated database with the default query deadline.
pub async fn repository() -> PgUserRepository {
    PgUserRepository::new(migrated_pool().await, Duration::from_secs(5))
}
