//! # Services Module
//!
//! The login and signup use cases, the capability traits they depend on and
//! their error taxonomy.

pub mod authenticator;
pub mod errors;
pub mod login;
pub mod signup;
pub mod traits;

#[cfg(test)]
pub mod fakes;

pub use authenticator::Authenticator;
pub use errors::{LoginError, SignupError, StoreError};
pub use traits::AuthService;
