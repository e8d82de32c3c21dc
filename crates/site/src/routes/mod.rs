//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /services               - Services page
//! GET  /about                  - About page
//!
//! # Contact
//! GET  /contact                - Contact form (?success=true shows the banner)
//! POST /contact                - Submit the contact form
//!
//! # Admin (no authentication yet; keep behind access control at the edge)
//! GET  /admin/contact          - List contact submissions
//! POST /admin/contact/update   - Mark a submission completed
//! POST /admin/contact/delete   - Delete a submission
//!
//! # Operational
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the database)
//! GET  /static/*               - Static assets
//! ```

pub mod admin;
pub mod contact;
pub mod pages;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route("/", get(admin::list_contacts))
        .route("/update", post(admin::update_contact))
        .route("/delete", post(admin::delete_contact))
}

/// Create all page and form routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(pages::home))
        .route("/services", get(pages::services))
        .route("/about", get(pages::about))
        // Contact form
        .route("/contact", get(contact::show).post(contact::submit))
        // Admin routes
        .nest("/admin/contact", admin_routes())
}

/// Assemble the full application router.
///
/// Includes health endpoints, static assets, request tracing, and request
/// ID correlation. Sentry layers are attached in `main` so tests can drive
/// this router directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/site/static"))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::extract::Request| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
/// Without storage configured there is nothing to verify, so the site
/// reports ready as long as it is serving.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };

    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
