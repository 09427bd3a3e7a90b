//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::UserRepository;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Dependencies are passed in
/// explicitly so tests can swap the repository for an in-memory one.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `users` - User repository implementation
    #[must_use]
    pub fn new(config: AppConfig, users: Arc<dyn UserRepository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, users }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the user repository.
    #[must_use]
    pub fn users(&self) -> &dyn UserRepository {
        self.inner.users.as_ref()
    }
}
