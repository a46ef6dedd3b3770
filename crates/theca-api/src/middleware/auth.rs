//! Auth gate: bearer-token verification for protected routes.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use theca_auth::JwtDecoder;
use theca_core::error::AppError;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Rejects requests without a valid access token; otherwise attaches
/// [`AuthUser`] to the request extensions and continues.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), &state.jwt_decoder)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Resolves the caller from the `Authorization` header.
pub fn authenticate(headers: &HeaderMap, decoder: &JwtDecoder) -> Result<AuthUser, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header"))?;

    let token = bearer_token(value)
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

    let claims = decoder.verify_access(token)?;

    // The verifier allows a few seconds of clock skew; the gate does not.
    if claims.is_expired() {
        return Err(AppError::unauthorized("Token expired"));
    }

    Ok(AuthUser::try_from(claims)?)
}

/// Returns the token when the header is exactly `<scheme> <token>` with a
/// case-insensitive `Bearer` scheme.
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}
