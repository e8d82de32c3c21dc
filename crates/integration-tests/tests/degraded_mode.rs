//! Integration tests for running without a database or mail relay.
//!
//! The site stays up when `DB_URI` is absent: pages serve normally while
//! everything touching contact storage reports that it is not configured.

use axum::http::StatusCode;

use larkspur_integration_tests::{TestSite, body_text, form_body};

#[tokio::test]
async fn test_pages_still_render() {
    let site = TestSite::degraded();

    for uri in ["/", "/services", "/about", "/contact"] {
        let response = site.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri} should render");
    }
}

#[tokio::test]
async fn test_submit_reports_storage_disabled() {
    let site = TestSite::degraded();

    let body = form_body(&[
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("phone", "+44 20 7946 0000"),
        ("subject", "Commission inquiry"),
        ("message", "I would like to discuss a project."),
    ]);
    let response = site.post_form("/contact", body).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_text(response).await,
        "Contact storage is not configured"
    );

    assert!(site.captured_mail().is_empty());
}

#[tokio::test]
async fn test_admin_list_reports_storage_disabled() {
    let site = TestSite::degraded();

    let response = site.get("/admin/contact").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_text(response).await,
        "Contact storage is not configured"
    );
}

#[tokio::test]
async fn test_admin_actions_report_storage_disabled() {
    let site = TestSite::degraded();

    let response = site
        .post_form("/admin/contact/update", form_body(&[("id", "1")]))
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = site
        .post_form("/admin/contact/delete", form_body(&[("id", "1")]))
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_endpoints_stay_ready() {
    let site = TestSite::degraded();

    let response = site.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    // Readiness does not fail on missing storage; the site is serving
    // exactly what it is configured to serve.
    let response = site.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}
