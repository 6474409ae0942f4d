//! In-memory fakes for the use case tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::auth::jwt::TokenError;
use crate::auth::models::{LoginTokens, User};
use crate::services::errors::StoreError;
use crate::services::traits::{
    PasswordHasher, PasswordMatcher, TokenGenerator, UserCreator, UserGetter,
};

pub fn mock_hash(password: &str) -> String {
    format!("{password}foo")
}

pub fn example_users() -> Vec<User> {
    (1..=3)
        .map(|i| User {
            id: i,
            username: format!("user{i}"),
            password: mock_hash(&format!("pass{i}")),
        })
        .collect()
}

pub struct MockUserGetter {
    users: Vec<User>,
    pub calls: AtomicUsize,
}

impl MockUserGetter {
    pub fn new() -> Self {
        Self::with_users(example_users())
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl UserGetter for MockUserGetter {
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .iter()
            .find(|user| user.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

pub struct BadUserGetter;

#[async_trait]
impl UserGetter for BadUserGetter {
    async fn get_user_by_username(&self, _username: &str) -> Result<User, StoreError> {
        Err(StoreError::Backend(anyhow!("connection refused")))
    }
}

#[derive(Default)]
pub struct MockUserCreator {
    pub created: Mutex<Vec<User>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl UserCreator for MockUserCreator {
    async fn create_user(&self, mut user: User) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        user.id = 7;
        self.created.lock().unwrap().push(user);
        Ok(())
    }
}

pub struct BadUserCreator;

#[async_trait]
impl UserCreator for BadUserCreator {
    async fn create_user(&self, _user: User) -> Result<(), StoreError> {
        Err(StoreError::Backend(anyhow!("disk full")))
    }
}

pub struct ConflictingUserCreator;

#[async_trait]
impl UserCreator for ConflictingUserCreator {
    async fn create_user(&self, _user: User) -> Result<(), StoreError> {
        Err(StoreError::Conflict)
    }
}

#[derive(Default)]
pub struct MockPasswordHasher {
    pub calls: AtomicUsize,
}

impl PasswordHasher for MockPasswordHasher {
    fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(mock_hash(password))
    }
}

pub struct BadPasswordHasher;

impl PasswordHasher for BadPasswordHasher {
    fn hash_password(&self, _password: &str) -> anyhow::Result<String> {
        Err(anyhow!("something went wrong"))
    }
}

#[derive(Default)]
pub struct MockPasswordMatcher {
    pub calls: AtomicUsize,
}

impl PasswordMatcher for MockPasswordMatcher {
    fn match_password(&self, password: &str, hashed: &str) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(mock_hash(password) == hashed)
    }
}

pub struct BadPasswordMatcher;

impl PasswordMatcher for BadPasswordMatcher {
    fn match_password(&self, _password: &str, _hashed: &str) -> anyhow::Result<bool> {
        Err(anyhow!("malformed hash"))
    }
}

#[derive(Default)]
pub struct MockTokenGenerator {
    pub calls: AtomicUsize,
}

impl TokenGenerator for MockTokenGenerator {
    fn generate_tokens(&self, _user_id: i64, _username: &str) -> Result<LoginTokens, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LoginTokens {
            access_token: "access.token.foo".to_string(),
            refresh_token: "refresh.token.bar".to_string(),
        })
    }
}

pub struct BadTokenGenerator;

impl TokenGenerator for BadTokenGenerator {
    fn generate_tokens(&self, _user_id: i64, _username: &str) -> Result<LoginTokens, TokenError> {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        Err(TokenError::Claims(err))
    }
}
