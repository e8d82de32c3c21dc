//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DB_URI` - `SQLite` connection string (e.g., sqlite://data/larkspur.db).
//!   When absent the site runs without storage: page routes still serve,
//!   while the contact form and admin screens report that storage is not
//!   configured.
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 8000)
//! - `SMTP_HOST` - SMTP relay host. When absent, mail is disabled and
//!   submission notifications are skipped.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! ## Required when `SMTP_HOST` is set
//! - `MAIL_FROM_ADDRESS` - Sender address for notification mail
//! - `ADMIN_EMAIL` - Recipient for new-submission notifications
//!
//! ## Optional when `SMTP_HOST` is set
//! - `SMTP_PORT` - Relay port (default: 587)
//! - `SMTP_USERNAME` / `SMTP_PASSWORD` - Relay credentials; attached only
//!   when both are present
//! - `MAIL_FROM_NAME` - Display name for the sender (default: Larkspur Studio)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use larkspur_core::Email;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// `SQLite` database connection URL; `None` runs the site without storage
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Outbound mail configuration; `None` disables notifications
    pub mail: Option<MailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Outbound mail (SMTP) configuration.
///
/// Implements `Debug` manually to redact the relay password.
#[derive(Clone)]
pub struct MailConfig {
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP relay port
    pub smtp_port: u16,
    /// SMTP username; credentials are attached only when paired with a password
    pub smtp_username: Option<String>,
    /// SMTP password
    pub smtp_password: Option<SecretString>,
    /// Display name for the From header
    pub from_name: String,
    /// Sender address for notification mail
    pub from_address: Email,
    /// Recipient for new-submission notifications
    pub admin_email: Email,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.as_ref().map(|_| "[REDACTED]"))
            .field("from_name", &self.from_name)
            .field("from_address", &self.from_address)
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse, or if mail is
    /// enabled but its required addresses are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_optional_env("DB_URI").map(SecretString::from);
        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let mail = MailConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            mail,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether a database connection is configured.
    #[must_use]
    pub const fn storage_enabled(&self) -> bool {
        self.database_url.is_some()
    }
}

impl MailConfig {
    /// Load mail configuration; `SMTP_HOST` absent means mail is disabled.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let smtp_username = get_optional_env("SMTP_USERNAME");
        let smtp_password = get_optional_env("SMTP_PASSWORD").map(SecretString::from);
        let from_name = get_env_or_default("MAIL_FROM_NAME", "Larkspur Studio");
        let from_address = get_email_env("MAIL_FROM_ADDRESS")?;
        let admin_email = get_email_env("ADMIN_EMAIL")?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_name,
            from_address,
            admin_email,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable parsed as an email address.
fn get_email_env(key: &str) -> Result<Email, ConfigError> {
    let value = get_required_env(key)?;
    Email::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mail_config() -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: Some("mailer".to_string()),
            smtp_password: Some(SecretString::from("super_secret_relay_password")),
            from_name: "Larkspur Studio".to_string(),
            from_address: Email::parse("studio@example.com").unwrap(),
            admin_email: Email::parse("admin@example.com").unwrap(),
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = SiteConfig {
            database_url: Some(SecretString::from("sqlite::memory:")),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            mail: None,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_storage_enabled() {
        let mut config = SiteConfig {
            database_url: None,
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            mail: None,
            sentry_dsn: None,
            sentry_environment: None,
        };
        assert!(!config.storage_enabled());

        config.database_url = Some(SecretString::from("sqlite://data/larkspur.db"));
        assert!(config.storage_enabled());
    }

    #[test]
    fn test_mail_config_debug_redacts_password() {
        let config = mail_config();
        let debug_output = format!("{config:?}");

        // Public fields should be visible
        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("mailer"));
        assert!(debug_output.contains("studio@example.com"));

        // The password must be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_relay_password"));
    }
}
