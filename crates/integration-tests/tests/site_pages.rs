//! Integration tests for public pages and operational endpoints.

use axum::http::StatusCode;

use larkspur_integration_tests::{TestSite, body_text};

#[tokio::test]
async fn test_home_renders() {
    let site = TestSite::new().await;

    let response = site.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Larkspur Studio"));
}

#[tokio::test]
async fn test_services_renders() {
    let site = TestSite::new().await;

    let response = site.get("/services").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Services"));
}

#[tokio::test]
async fn test_about_renders() {
    let site = TestSite::new().await;

    let response = site.get("/about").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("About"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let site = TestSite::new().await;

    let response = site.get("/no-such-page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let site = TestSite::new().await;

    let response = site.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_with_database() {
    let site = TestSite::new().await;

    let response = site.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let site = TestSite::new().await;

    let response = site.get("/").await;
    assert!(response.headers().contains_key("x-request-id"));
}
