//! Integration tests for request metrics and the admin listener.

mod helpers;

use std::time::Duration;

use http::StatusCode;

use theca_metrics::rps;

#[tokio::test]
async fn test_requests_are_counted_by_path_and_status() {
    let app = helpers::TestApp::new();
    app.signup("alice").await;
    app.login("alice", "wrong-password").await;

    let metrics = &app.state.metrics;
    assert_eq!(metrics.request_count("/v1/register", "POST", "200"), 1);
    assert_eq!(metrics.request_count("/v1/login", "POST", "200"), 1);
    assert_eq!(metrics.request_count("/v1/login", "POST", "400"), 1);
    assert_eq!(metrics.error_count("http_400", "/v1/login", "POST"), 1);
    assert_eq!(metrics.error_count("authentication_error", "/v1/login", "POST"), 1);
    assert_eq!(metrics.duration_count("/v1/login", "POST"), 2);
}

#[tokio::test]
async fn test_auth_rejection_is_counted() {
    let app = helpers::TestApp::new();

    app.request("DELETE", "/v1/api/logout", None, None).await;

    let metrics = &app.state.metrics;
    assert_eq!(metrics.request_count("/v1/api/logout", "DELETE", "401"), 1);
    assert_eq!(metrics.error_count("http_401", "/v1/api/logout", "DELETE"), 1);
}

#[tokio::test]
async fn test_validation_error_is_named() {
    let app = helpers::TestApp::new();
    app.register("bad", "alice", "password123").await;

    assert_eq!(
        app.state
            .metrics
            .error_count("validation_error", "/v1/register", "POST"),
        1
    );
}

#[tokio::test]
async fn test_handler_and_middleware_share_path_label() {
    let app = helpers::TestApp::new();
    app.signup("alice").await;

    let res = app
        .request(
            "POST",
            "/v1/login?next=/home",
            Some(serde_json::json!({ "username": "alice", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let metrics = &app.state.metrics;
    assert_eq!(metrics.request_count("/v1/login", "POST", "400"), 1);
    assert_eq!(metrics.error_count("authentication_error", "/v1/login", "POST"), 1);
    assert_eq!(metrics.request_count("/v1/login", "POST", "200"), 1);
    assert_eq!(app.state.rps.pending("/v1/login", "POST"), 2);
}

#[tokio::test]
async fn test_unmatched_path_uses_raw_uri() {
    let app = helpers::TestApp::new();

    let res = app.request("GET", "/v1/nope", None, None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.metrics.request_count("/v1/nope", "GET", "404"), 1);
}

#[tokio::test]
async fn test_rps_gauge_after_collapse() {
    let app = helpers::TestApp::new();
    for _ in 0..5 {
        app.login("nobody", "password123").await;
    }
    assert_eq!(app.state.rps.pending("/v1/login", "POST"), 5);

    app.state.rps.collapse(rps::now() + Duration::from_secs(1));
    assert_eq!(app.state.metrics.get_rps("/v1/login", "POST"), 1.0);

    app.state.rps.collapse(rps::now() + Duration::from_secs(6));
    assert_eq!(app.state.metrics.get_rps("/v1/login", "POST"), 0.0);
    assert!(app.state.rps.is_empty());
}

#[tokio::test]
async fn test_admin_metrics_exposition() {
    let app = helpers::TestApp::new();
    app.request("DELETE", "/v1/api/logout", None, None).await;

    let res = app.admin_get("/metrics").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.text.contains("# TYPE theca_request_total counter"));
    assert!(res.text.contains(
        "theca_request_total{path=\"/v1/api/logout\",method=\"DELETE\",status=\"401\"} 1"
    ));
    assert!(res.text.contains(
        "theca_error_total{error_name=\"http_401\",path=\"/v1/api/logout\",method=\"DELETE\"} 1"
    ));
    assert!(res.text.contains("# TYPE theca_request_duration_seconds histogram"));
}

#[tokio::test]
async fn test_lifecycle_events_are_counted() {
    let app = helpers::TestApp::new();
    let (access, _) = app.signup("alice").await;
    app.register("alice@example.com", "alice", "password123").await;
    app.request("DELETE", "/v1/api/sessions", None, Some(&access)).await;

    let res = app.admin_get("/metrics").await;
    assert!(res.text.contains("# TYPE theca_info_total counter"));
    assert!(res.text.contains("theca_info_total{info_name=\"user_registered\"} 1"));
    assert!(res.text.contains("theca_info_total{info_name=\"sessions_revoked\"} 1"));
}

#[tokio::test]
async fn test_admin_routes_are_not_metered() {
    let app = helpers::TestApp::new();

    let res = app.admin_get("/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["status"], "ok");
    assert!(res.body["data"]["version"].is_string());

    app.admin_get("/metrics").await;
    assert_eq!(app.state.metrics.request_count("/health", "GET", "200"), 0);
    assert_eq!(app.state.metrics.request_count("/metrics", "GET", "200"), 0);
    assert!(app.state.rps.is_empty());
}

#[tokio::test]
async fn test_admin_routes_not_on_public_listener() {
    let app = helpers::TestApp::new();
    let res = app.request("GET", "/metrics", None, None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
