//! Integration tests for refresh-token rotation and session revocation.

mod helpers;

use http::StatusCode;

use theca_auth::JwtDecoder;

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = helpers::TestApp::new();
    let (_, refresh) = app.signup("alice").await;

    let res = app.request_with_cookie("POST", "/v1/refresh", &refresh, None).await;
    assert_eq!(res.status, StatusCode::OK);

    let access = res.access_token();
    let decoder = JwtDecoder::new(&helpers::test_auth_config());
    assert_eq!(decoder.verify_access(&access).unwrap().user_id, 1);

    let rotated = res.refresh_cookie().expect("rotated refresh cookie");
    assert_eq!(decoder.verify_refresh(&rotated).unwrap().token_version, 0);
}

#[tokio::test]
async fn test_refresh_without_cookie() {
    let app = helpers::TestApp::new();

    let res = app.request("POST", "/v1/refresh", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let app = helpers::TestApp::new();
    let (access, _) = app.signup("alice").await;

    let res = app.request_with_cookie("POST", "/v1/refresh", &access, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_all_revokes_prior_refresh_tokens() {
    let app = helpers::TestApp::new();
    let (access, refresh) = app.signup("alice").await;

    let res = app.request("DELETE", "/v1/api/sessions", None, Some(&access)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.clears_refresh_cookie());

    let res = app.request_with_cookie("POST", "/v1/refresh", &refresh, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_code(), "UNAUTHORIZED");

    // A fresh login carries the bumped version and refreshes fine.
    let res = app.login("alice", "password123").await;
    let fresh = res.refresh_cookie().unwrap();
    let claims = JwtDecoder::new(&helpers::test_auth_config())
        .verify_refresh(&fresh)
        .unwrap();
    assert_eq!(claims.token_version, 1);

    let res = app.request_with_cookie("POST", "/v1/refresh", &fresh, None).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_access_token_survives_logout_all() {
    let app = helpers::TestApp::new();
    let (access, _) = app.signup("alice").await;

    app.request("DELETE", "/v1/api/sessions", None, Some(&access)).await;

    // Access tokens are stateless; only refresh tokens are versioned.
    let res = app.request("DELETE", "/v1/api/logout", None, Some(&access)).await;
    assert_eq!(res.status, StatusCode::OK);
}
