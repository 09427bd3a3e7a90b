//! Unified error handling with Sentry integration.
//!
//! `AppError` covers the outcomes that end in the generic error page. Handlers
//! that re-render a form with a message build their response directly and
//! only fall back to `AppError` when there is no form to show.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::views::ErrorPage;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Repository call failed. `context` is the message shown to the client.
    #[error("{context}: {source}")]
    Repository {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Wrap a repository failure with the message shown to the client.
    #[must_use]
    pub const fn repository(context: &'static str, source: RepositoryError) -> Self {
        Self::Repository { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Repository { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Repository { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match self {
            Self::Repository { context, .. } => context.to_owned(),
            Self::NotFound(message) | Self::BadRequest(message) => message,
        };

        let page = ErrorPage {
            status: status.as_u16(),
            message,
        };

        (status, page).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
