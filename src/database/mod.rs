//! # Database Module
//!
//! User storage: PostgreSQL via tokio-postgres/deadpool with refinery
//! migrations, and an in-memory fallback.

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod models;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use memory::InMemoryUserStore;
