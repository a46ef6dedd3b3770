//! Account lifecycle: register, login, refresh, and revoking every session.

use std::sync::Arc;

use tracing::debug;

use theca_auth::{JwtDecoder, JwtEncoder, PasswordHasher, TokenPair};
use theca_core::error::AppError;
use theca_database::UserStore;
use theca_entity::user::{NewUser, User};

/// Orchestrates the user store, password hasher, and token issuer.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            store,
            hasher,
            encoder,
            decoder,
        }
    }

    /// Creates an account. Input is expected to be validated already.
    ///
    /// Fails with `USER_ALREADY_EXISTS` if the username or email is taken.
    pub async fn register(&self, email: &str, username: &str, password: &str) -> Result<User, AppError> {
        let password_hash = self.hasher.hash(password)?;

        let user = self
            .store
            .create_if_absent(NewUser {
                email: email.to_string(),
                username: username.to_string(),
                password_hash,
            })
            .await?;

        debug!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and issues an access token plus a refresh token
    /// bound to the user's current token version.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            debug!(user_id = user.id, "Password mismatch");
            return Err(AppError::invalid_password());
        }

        let tokens = self.encoder.issue_pair(user.id, user.refresh_token_version)?;
        debug!(user_id = user.id, "Login successful");
        Ok(tokens)
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    ///
    /// The presented token must carry the user's current version.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.decoder.verify_refresh(refresh_token)?;

        let user = self
            .store
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        claims.ensure_version(user.refresh_token_version)?;

        let tokens = self.encoder.issue_pair(user.id, user.refresh_token_version)?;
        debug!(user_id = user.id, "Tokens refreshed");
        Ok(tokens)
    }

    /// Revokes every refresh token issued to the user so far.
    pub async fn logout_from_all_sessions(&self, user_id: i64) -> Result<(), AppError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        user.bump_token_version();
        self.store.save(&user).await?;

        debug!(user_id, version = user.refresh_token_version, "Logged out from all sessions");
        Ok(())
    }
}
