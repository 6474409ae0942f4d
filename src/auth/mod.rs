//! # Authentication Module
//!
//! Token signing, password hashing and the user/token models shared by the
//! use cases and the HTTP layer.

pub mod jwt;
pub mod models;
pub mod password;
