//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to the user list
//! GET  /health                 - Liveness probe ("ok")
//! GET  /health/ready           - Readiness probe (database ping)
//!
//! # Users
//! GET  /users?page=&limit=     - Paginated list with create form
//! POST /users                  - Create (form: name, email, age)
//! GET  /users/{id}             - Edit form
//! POST /users/{id}             - Update (form: name, email, age)
//! POST /users/{id}/delete      - Delete
//! ```

pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route("/{id}", get(users::edit).post(users::update))
        .route("/{id}/delete", post(users::delete))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/users", user_routes())
}

async fn home() -> Redirect {
    Redirect::to("/users")
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.users().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("page not found".to_owned())
}
