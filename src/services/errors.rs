//! Error types shared by the use cases and their collaborators.
//!
//! `LoginError` and `SignupError` are the only errors that leave the use case
//! layer. Underlying failures are logged where they are mapped to `Internal`
//! and never carried across.

use thiserror::Error;

/// Outcome of a failed login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("user not found")]
    NotFound,

    #[error("incorrect password")]
    BadPassword,

    #[error("internal error")]
    Internal,
}

/// Outcome of a failed signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignupError {
    #[error("duplicate username")]
    Duplicate,

    #[error("internal error")]
    Internal,
}

/// Errors reported by user storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    /// A user with this username already exists.
    #[error("username already exists")]
    Conflict,

    #[error("storage error: {0}")]
    Backend(#[from] anyhow::Error),
}
