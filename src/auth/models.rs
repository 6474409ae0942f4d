//! Authentication Models
//!
//! Data structures for users, issued tokens and request payloads.

use serde::{Deserialize, Serialize};

/// User account as stored by the persistence layer.
///
/// `password` always holds the hashed form, never the plaintext.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier. Left at `0` when handing a new user to the store.
    pub id: i64,
    pub username: String,
    pub password: String,
}

impl User {
    /// A not-yet-persisted user; the store assigns the id.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password: password_hash.into(),
        }
    }
}

/// Access/refresh token pair returned from a successful login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
}

