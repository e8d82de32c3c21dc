//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::SiteConfig;
use crate::db::ContactRepository;
use crate::error::AppError;
use crate::services::Mailer;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the mailer. Both are
/// optional so the site degrades gracefully when they are not configured.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: Option<SqlitePool>,
    mailer: Option<Mailer>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig, pool: Option<SqlitePool>, mailer: Option<Mailer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool, if configured.
    #[must_use]
    pub fn pool(&self) -> Option<&SqlitePool> {
        self.inner.pool.as_ref()
    }

    /// Get a reference to the mailer, if configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&Mailer> {
        self.inner.mailer.as_ref()
    }

    /// Get a contact repository bound to the configured pool.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StorageDisabled` when the site runs without a
    /// database.
    pub fn contacts(&self) -> Result<ContactRepository<'_>, AppError> {
        self.inner
            .pool
            .as_ref()
            .map(ContactRepository::new)
            .ok_or(AppError::StorageDisabled)
    }
}
