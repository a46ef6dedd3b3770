//! In-process user store.
//!
//! Enforces the same uniqueness rules as the `users` table. Used by the
//! `memory` database backend and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use theca_core::error::AppError;
use theca_core::result::AppResult;
use theca_entity::user::{NewUser, User};

use crate::store::UserStore;

#[derive(Debug, Default)]
struct State {
    users: HashMap<i64, User>,
    next_id: i64,
}

/// User store backed by a map behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    state: RwLock<State>,
}

impl MemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn create_if_absent(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::user_already_exists(
                "A user with this username already exists",
            ));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::user_already_exists(
                "A user with this email already exists",
            ));
        }

        state.next_id += 1;
        let now = Utc::now();
        let created = User {
            id: state.next_id,
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            verification_code: None,
            refresh_token_version: 0,
            amount_of_bookmarks: 0,
            is_verified: false,
            is_premium: false,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                stored.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::user_not_found()),
        }
    }
}
