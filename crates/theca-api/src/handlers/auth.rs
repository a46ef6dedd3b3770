//! Auth handlers: register, login, refresh, logout, logout from all sessions.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use theca_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{AccessTokenResponse, ApiResponse};
use crate::extractors::{AuthUser, RouteLabels, ValidatedJson};
use crate::state::AppState;

/// Name of the http-only cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// POST /v1/register
pub async fn register(
    State(state): State<AppState>,
    route: RouteLabels,
    payload: Result<ValidatedJson<RegisterRequest>, AppError>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let ValidatedJson(req) =
        payload.inspect_err(|_| route.record_error(&state.metrics, "validation_error"))?;

    state
        .auth_service
        .register(&req.email, &req.username, &req.password)
        .await
        .inspect_err(|_| route.record_error(&state.metrics, "registration_error"))?;
    state.metrics.record_info("user_registered");

    Ok(Json(ApiResponse::ok("User registered successfully".to_string())))
}

/// POST /v1/login
pub async fn login(
    State(state): State<AppState>,
    route: RouteLabels,
    jar: CookieJar,
    payload: Result<ValidatedJson<LoginRequest>, AppError>,
) -> Result<(CookieJar, Json<ApiResponse<AccessTokenResponse>>), AppError> {
    let ValidatedJson(req) =
        payload.inspect_err(|_| route.record_error(&state.metrics, "validation_error"))?;

    let tokens = state
        .auth_service
        .login(&req.username, &req.password)
        .await
        .inspect_err(|_| route.record_error(&state.metrics, "authentication_error"))?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh_token));
    Ok((
        jar,
        Json(ApiResponse::ok(AccessTokenResponse {
            access_token: tokens.access_token,
        })),
    ))
}

/// POST /v1/refresh
pub async fn refresh(
    State(state): State<AppState>,
    route: RouteLabels,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<AccessTokenResponse>>), AppError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing refresh token"))
        .inspect_err(|_| route.record_error(&state.metrics, "authentication_error"))?;

    let tokens = state
        .auth_service
        .refresh(&token)
        .await
        .inspect_err(|_| route.record_error(&state.metrics, "authentication_error"))?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh_token));
    Ok((
        jar,
        Json(ApiResponse::ok(AccessTokenResponse {
            access_token: tokens.access_token,
        })),
    ))
}

/// DELETE /v1/api/logout
pub async fn logout(auth: AuthUser, jar: CookieJar) -> (CookieJar, Json<ApiResponse<String>>) {
    tracing::debug!(user_id = auth.user_id, "Logged out");
    (
        jar.add(removal_cookie()),
        Json(ApiResponse::ok("Logged out successfully".to_string())),
    )
}

/// DELETE /v1/api/sessions
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<String>>), AppError> {
    state
        .auth_service
        .logout_from_all_sessions(auth.user_id)
        .await?;
    state.metrics.record_info("sessions_revoked");

    Ok((
        jar.add(removal_cookie()),
        Json(ApiResponse::ok(
            "Logged out from all sessions".to_string(),
        )),
    ))
}

fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.server.secure_cookies)
        .same_site(SameSite::Lax)
        .build()
}

/// Expired, empty cookie; sent even when the request carried none.
fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((REFRESH_COOKIE, "")).path("/").http_only(true).build();
    cookie.make_removal();
    cookie
}
