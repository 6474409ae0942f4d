//! Capability traits the login and signup use cases depend on.
//!
//! Each trait is deliberately narrow so storage, hashing and token issuance
//! can be swapped for in-memory fakes in tests.

use async_trait::async_trait;

use crate::auth::jwt::TokenError;
use crate::auth::models::{LoginTokens, User};
use crate::services::errors::{LoginError, SignupError, StoreError};

/// Resolves a user by username.
#[async_trait]
pub trait UserGetter: Send + Sync {
    /// Returns [`StoreError::NotFound`] when no user has this username.
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError>;
}

/// Persists a new user.
#[async_trait]
pub trait UserCreator: Send + Sync {
    /// The store assigns `user.id`. Returns [`StoreError::Conflict`] if it
    /// detects the username is already taken.
    async fn create_user(&self, user: User) -> Result<(), StoreError>;
}

pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> anyhow::Result<String>;
}

pub trait PasswordMatcher: Send + Sync {
    /// `Ok(false)` for a wrong password; `Err` only when matching itself fails.
    fn match_password(&self, password: &str, hashed: &str) -> anyhow::Result<bool>;
}

pub trait TokenGenerator: Send + Sync {
    fn generate_tokens(&self, user_id: i64, username: &str) -> Result<LoginTokens, TokenError>;
}

/// The operations exposed to the transport layer.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginTokens, LoginError>;

    async fn signup(&self, username: &str, password: &str) -> Result<(), SignupError>;
}
