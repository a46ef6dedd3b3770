//! Integration tests for registration, login, and the auth gate.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;

use theca_auth::{JwtDecoder, JwtEncoder};
use theca_core::config::AuthConfig;

#[tokio::test]
async fn test_register_then_login() {
    let app = helpers::TestApp::new();

    let res = app.register("alice@example.com", "alice", "password123").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"], "User registered successfully");
    assert!(res.body.get("error").is_none());

    let res = app.login("alice", "password123").await;
    assert_eq!(res.status, StatusCode::OK);
    let token = res.access_token();
    assert!(res.refresh_cookie().is_some());
    let cookie = &res.set_cookie[0];
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));

    let claims = JwtDecoder::new(&helpers::test_auth_config())
        .verify_access(&token)
        .unwrap();
    assert_eq!(claims.user_id, 1);
}

#[tokio::test]
async fn test_duplicate_username_or_email() {
    let app = helpers::TestApp::new();
    app.register("alice@example.com", "alice", "password123").await;

    let res = app.register("other@example.com", "alice", "password123").await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.error_code(), "USER_ALREADY_EXISTS");
    assert_eq!(res.body["success"], false);

    let res = app.register("alice@example.com", "alice2", "password123").await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.error_code(), "USER_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = helpers::TestApp::new();
    app.register("alice@example.com", "alice", "password123").await;

    let res = app.login("alice", "wrong-password").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "INVALID_PASSWORD");
    assert!(res.refresh_cookie().is_none());
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = helpers::TestApp::new();

    let res = app.login("nobody", "password123").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error_code(), "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_bodies() {
    let app = helpers::TestApp::new();

    let res = app
        .register("not-an-email", "alice", "password123")
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "INVALID_REQUEST");

    let res = app
        .request("POST", "/v1/login", Some(serde_json::json!({ "username": "alice" })), None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "INVALID_REQUEST");

    let req = http::Request::builder()
        .method("POST")
        .uri("/v1/register")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let res = app.send_public(req).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "INVALID_REQUEST");
}

#[tokio::test]
async fn test_logout_requires_token() {
    let app = helpers::TestApp::new();

    let res = app.request("DELETE", "/v1/api/logout", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_logout_with_token_clears_cookie() {
    let app = helpers::TestApp::new();
    let (access, _) = app.signup("alice").await;

    let res = app.request("DELETE", "/v1/api/logout", None, Some(&access)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"], "Logged out successfully");
    assert!(res.clears_refresh_cookie());
}

#[tokio::test]
async fn test_malformed_authorization_headers() {
    let app = helpers::TestApp::new();
    let (access, _) = app.signup("alice").await;

    for value in [
        access.clone(),
        format!("Basic {access}"),
        format!("Bearer {access} extra"),
        "Bearer".to_string(),
    ] {
        let req = http::Request::builder()
            .method("DELETE")
            .uri("/v1/api/logout")
            .header("Authorization", value)
            .body(axum::body::Body::empty())
            .unwrap();
        let res = app.send_public(req).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    }

    let req = http::Request::builder()
        .method("DELETE")
        .uri("/v1/api/logout")
        .header("Authorization", format!("bearer {access}"))
        .body(axum::body::Body::empty())
        .unwrap();
    assert_eq!(app.send_public(req).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let app = helpers::TestApp::new();
    app.signup("alice").await;

    let foreign = AuthConfig {
        access_secret: "someone-elses-secret".to_string(),
        ..helpers::test_auth_config()
    };
    let token = JwtEncoder::new(&foreign).issue_access(1).unwrap();

    let res = app.request("DELETE", "/v1/api/logout", None, Some(&token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = helpers::TestApp::new();
    app.signup("alice").await;

    let token = JwtEncoder::new(&helpers::test_auth_config())
        .issue_access_at(1, Utc::now() - Duration::hours(1))
        .unwrap();

    let res = app.request("DELETE", "/v1/api/logout", None, Some(&token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_rejected_request_never_reaches_handler() {
    let app = helpers::TestApp::new();
    let (_, refresh) = app.signup("alice").await;

    let foreign = AuthConfig {
        access_secret: "someone-elses-secret".to_string(),
        ..helpers::test_auth_config()
    };
    let forged = JwtEncoder::new(&foreign).issue_access(1).unwrap();

    // Would bump the token version if the handler ran.
    let res = app.request("DELETE", "/v1/api/sessions", None, Some(&forged)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.request_with_cookie("POST", "/v1/refresh", &refresh, None).await;
    assert_eq!(res.status, StatusCode::OK);
}
