//! Integration tests for the health endpoint and cross-cutting behavior.

mod common;

use axum::http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn test_health_reports_backends() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "memory");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/does-not-exist", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_notification_id_is_400() {
    let app = TestApp::new().await;
    let user = app.register("Ana", "ana@example.com").await;

    let response = app
        .request("PATCH", "/notifications/42/read", None, Some(&user.token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid UUID: 42");
}
