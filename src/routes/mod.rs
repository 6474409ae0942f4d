// # Routes Module
//
// - HTTP route handlers, grouped by functionality.
// - `health`: liveness endpoint
// - `auth`: login and signup

/// Health check endpoint
pub mod health;

/// Login and signup endpoints
pub mod auth;
