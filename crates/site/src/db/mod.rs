//! Database operations for the site's `SQLite` store.
//!
//! # Tables
//!
//! - `contact` - Contact form submissions
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/site/migrations/` and applied when
//! the pool is created.

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub mod contacts;

pub use contacts::ContactRepository;

/// Repository-level errors for database operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data integrity issue (e.g., a stored status that fails to parse).
    #[error("Data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool and apply pending migrations.
///
/// The database file and its parent directory are created if missing.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid, the connection cannot be
/// established, or a migration fails.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    ensure_parent_dir(url)?;

    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    // An in-memory database exists per connection, so the pool must stay on
    // the single connection that ran the migrations.
    let max_connections = if url.contains(":memory:") { 1 } else { 10 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

    Ok(pool)
}

/// Create the parent directory for a file-backed database URL.
fn ensure_parent_dir(url: &str) -> Result<(), sqlx::Error> {
    let Some(path) = file_path(url) else {
        return Ok(());
    };
    if let Some(parent) = std::path::Path::new(&path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
        }
    }
    Ok(())
}

/// Extract the filesystem path from a `sqlite:` URL, if it names a file.
fn file_path(url: &str) -> Option<String> {
    if url.contains(":memory:") {
        return None;
    }
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_strips_scheme_and_params() {
        assert_eq!(
            file_path("sqlite://data/larkspur.db").as_deref(),
            Some("data/larkspur.db")
        );
        assert_eq!(
            file_path("sqlite:data/larkspur.db?mode=rwc").as_deref(),
            Some("data/larkspur.db")
        );
        assert_eq!(file_path("larkspur.db").as_deref(), Some("larkspur.db"));
    }

    #[test]
    fn test_file_path_skips_in_memory() {
        assert_eq!(file_path("sqlite::memory:"), None);
        assert_eq!(file_path("sqlite::memory:?cache=shared"), None);
    }
}
