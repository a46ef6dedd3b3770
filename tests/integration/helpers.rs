//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use theca_api::{AppState, build_admin_router, build_public_router};
use theca_auth::{HashParams, PasswordHasher};
use theca_core::config::{AppConfig, AuthConfig, DatabaseBackend};
use theca_database::MemoryUserRepository;

/// Test application context
pub struct TestApp {
    /// Public `/v1` router
    pub public: Router,
    /// Admin router (`/metrics`, `/health`)
    pub admin: Router,
    /// Shared state behind both routers
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application backed by the in-memory store
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config.auth = test_auth_config();

        let hasher = PasswordHasher::with_params(
            HashParams::new(1024, 1, 1, None).expect("valid argon2 params"),
        );
        let state = AppState::new(
            Arc::new(config),
            Arc::new(MemoryUserRepository::new()),
            hasher,
        );

        Self {
            public: build_public_router(state.clone()),
            admin: build_admin_router(state.clone()),
            state,
        }
    }

    /// Register a user through the API
    pub async fn register(&self, email: &str, username: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/v1/register",
            Some(serde_json::json!({
                "email": email,
                "username": username,
                "password": password,
            })),
            None,
        )
        .await
    }

    /// Log in and return the full response
    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/v1/login",
            Some(serde_json::json!({
                "username": username,
                "password": password,
            })),
            None,
        )
        .await
    }

    /// Register and log in; returns (access token, refresh token)
    pub async fn signup(&self, username: &str) -> (String, String) {
        let email = format!("{username}@example.com");
        let res = self.register(&email, username, "password123").await;
        assert_eq!(res.status, StatusCode::OK, "register failed: {:?}", res.body);

        let res = self.login(username, "password123").await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {:?}", res.body);
        (res.access_token(), res.refresh_cookie().expect("refresh cookie"))
    }

    /// Make a JSON request against the public router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        send(&self.public, req).await
    }

    /// Make a request carrying the refresh cookie
    pub async fn request_with_cookie(&self, method: &str, path: &str, refresh: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(COOKIE, format!("refreshToken={refresh}"));

        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        send(&self.public, req.body(Body::empty()).expect("Failed to build request")).await
    }

    /// Make a raw request against the public router
    pub async fn send_public(&self, req: Request<Body>) -> TestResponse {
        send(&self.public, req).await
    }

    /// GET a path on the admin router
    pub async fn admin_get(&self, path: &str) -> TestResponse {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        send(&self.admin, req).await
    }
}

/// Auth settings shared by the app and by tests that mint their own tokens
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        access_secret: "integration-access-secret".to_string(),
        refresh_secret: "integration-refresh-secret".to_string(),
        access_ttl_minutes: 15,
        refresh_ttl_days: 7,
    }
}

async fn send(router: &Router, req: Request<Body>) -> TestResponse {
    let response = router
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let set_cookie = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(String::from)
        .collect();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let text = String::from_utf8_lossy(&body_bytes).into_owned();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        body,
        text,
        set_cookie,
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` if not JSON)
    pub body: Value,
    /// Raw body text
    pub text: String,
    /// Every `Set-Cookie` header value
    pub set_cookie: Vec<String>,
}

impl TestResponse {
    /// `error.code` of a failure envelope
    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }

    /// `data.access_token` of a login/refresh envelope
    pub fn access_token(&self) -> String {
        self.body["data"]["access_token"]
            .as_str()
            .expect("access_token in response")
            .to_string()
    }

    /// Value of the `refreshToken` cookie set by this response, if any
    pub fn refresh_cookie(&self) -> Option<String> {
        self.set_cookie.iter().find_map(|c| {
            let pair = c.split(';').next()?;
            let value = pair.strip_prefix("refreshToken=")?;
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    /// Whether this response clears the `refreshToken` cookie
    pub fn clears_refresh_cookie(&self) -> bool {
        self.set_cookie
            .iter()
            .any(|c| c.starts_with("refreshToken=;") || c.starts_with("refreshToken=\"\""))
    }
}
