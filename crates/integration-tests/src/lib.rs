//! Integration test harness for the Larkspur Studio site.
//!
//! Tests drive the assembled router in process with `tower::ServiceExt`,
//! backed by an in-memory `SQLite` database and a capturing mailer. No
//! server or mail relay needs to be running.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p larkspur-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower::ServiceExt;

use larkspur_site::config::SiteConfig;
use larkspur_site::db::{ContactRepository, create_pool};
use larkspur_site::routes;
use larkspur_site::services::{CapturedMail, Mailer};
use larkspur_site::state::AppState;

/// Sender address used by test mailers.
pub const FROM_ADDRESS: &str = "studio@example.com";

/// Admin notification address used by test mailers.
pub const ADMIN_ADDRESS: &str = "admin@example.com";

/// A fully wired site instance for in-process tests.
pub struct TestSite {
    app: Router,
    pool: Option<SqlitePool>,
    mailer: Option<Mailer>,
}

impl TestSite {
    /// Spin up a site with in-memory storage and a capturing mailer.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory database or the mailer cannot be created.
    pub async fn new() -> Self {
        let pool = create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .expect("Failed to create in-memory database");
        let mailer =
            Mailer::capturing(FROM_ADDRESS, ADMIN_ADDRESS).expect("Failed to create mailer");

        let state = AppState::new(test_config(true), Some(pool.clone()), Some(mailer.clone()));

        Self {
            app: routes::app(state),
            pool: Some(pool),
            mailer: Some(mailer),
        }
    }

    /// Spin up a site with neither storage nor mail configured.
    #[must_use]
    pub fn degraded() -> Self {
        let state = AppState::new(test_config(false), None, None);

        Self {
            app: routes::app(state),
            pool: None,
            mailer: None,
        }
    }

    /// Issue a GET request against the site.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or routed.
    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed")
    }

    /// Issue a form POST against the site.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or routed.
    pub async fn post_form(&self, uri: &str, body: String) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Failed to build request");

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed")
    }

    /// Repository bound to the test database.
    ///
    /// # Panics
    ///
    /// Panics when called on a degraded site with no storage.
    #[must_use]
    pub fn contacts(&self) -> ContactRepository<'_> {
        let pool = self.pool.as_ref().expect("Test site has no database");
        ContactRepository::new(pool)
    }

    /// Mail recorded by the capturing mailer so far.
    #[must_use]
    pub fn captured_mail(&self) -> Vec<CapturedMail> {
        self.mailer
            .as_ref()
            .map(Mailer::captured)
            .unwrap_or_default()
    }
}

/// Wait until the capturing mailer has recorded at least `count` messages.
///
/// Notification mail goes out on spawned tasks, so tests poll briefly
/// instead of asserting immediately after the response.
///
/// # Panics
///
/// Panics if the messages do not arrive within two seconds.
pub async fn wait_for_mail(site: &TestSite, count: usize) -> Vec<CapturedMail> {
    for _ in 0..200 {
        let mail = site.captured_mail();
        if mail.len() >= count {
            return mail;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!(
        "Expected {count} captured messages, got {}",
        site.captured_mail().len()
    );
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be collected.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// URL-encode form pairs into a request body.
///
/// # Panics
///
/// Panics if encoding fails.
#[must_use]
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).expect("Failed to encode form body")
}

fn test_config(with_storage: bool) -> SiteConfig {
    SiteConfig {
        database_url: with_storage.then(|| SecretString::from("sqlite::memory:")),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        mail: None,
        sentry_dsn: None,
        sentry_environment: None,
    }
}
