//! # Auth Service
//!
//! Authentication backend exposing login and signup, built with Axum and Tokio.
//!
//! ## Architecture
//! - `services`: the login/signup use cases and the capability traits they run against
//! - `auth`: token signing (HS256 access/refresh pairs) and Argon2 password hashing
//! - `database`: PostgreSQL user store with migrations, plus an in-memory fallback
//! - `routes`: HTTP handlers
//! - `server`: router assembly and startup
//! - `config`: environment configuration

pub mod auth;
pub mod config;
pub mod database;
pub mod routes;
pub mod server;
pub mod services;
