//! Auth routes for login and signup

use std::collections::HashMap;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use thiserror::Error;

use crate::auth::models::LoginTokens;
use crate::server::AppState;
use crate::services::{LoginError, SignupError};

/// Failures reported to HTTP clients as plain-text bodies
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Internal error")]
    Internal,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Username is required")]
    MissingUsername,

    #[error("Password is required")]
    MissingPassword,

    #[error("User '{0}' does not exist")]
    UserNotFound(String),

    #[error("Incorrect password")]
    BadPassword,

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),
}

impl HttpError {
    fn status(&self) -> StatusCode {
        match self {
            HttpError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::InvalidJson
            | HttpError::MissingUsername
            | HttpError::MissingPassword
            | HttpError::BadPassword => StatusCode::BAD_REQUEST,
            HttpError::UserNotFound(_) => StatusCode::NOT_FOUND,
            HttpError::UsernameTaken(_) => StatusCode::CONFLICT,
        }
    }

    fn from_login(err: LoginError, username: String) -> Self {
        match err {
            LoginError::NotFound => HttpError::UserNotFound(username),
            LoginError::BadPassword => HttpError::BadPassword,
            LoginError::Internal => HttpError::Internal,
        }
    }

    fn from_signup(err: SignupError, username: String) -> Self {
        match err {
            SignupError::Duplicate => HttpError::UsernameTaken(username),
            SignupError::Internal => HttpError::Internal,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

type CredentialFields = HashMap<String, Option<String>>;

/// Extract `(username, password)` from a JSON body, username checked first.
///
/// The body must be a JSON object of strings; any other member type is
/// `Invalid JSON`. A `null` body counts as an empty object and a `null`
/// member as an empty string.
fn parse_credentials(body: Result<Bytes, BytesRejection>) -> Result<(String, String), HttpError> {
    let body = body.map_err(|e| {
        tracing::error!("Failed to read request body: {}", e);
        HttpError::Internal
    })?;

    let mut fields = serde_json::from_slice::<Option<CredentialFields>>(&body)
        .map_err(|_| HttpError::InvalidJson)?
        .unwrap_or_default();

    let username = fields
        .remove("username")
        .ok_or(HttpError::MissingUsername)?
        .unwrap_or_default();
    let password = fields
        .remove("password")
        .ok_or(HttpError::MissingPassword)?
        .unwrap_or_default();
    Ok((username, password))
}

pub async fn login(
    State(app_state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<LoginTokens>, HttpError> {
    let (username, password) = parse_credentials(body)?;

    let tokens = app_state
        .auth_service
        .login(&username, &password)
        .await
        .map_err(|e| HttpError::from_login(e, username))?;

    Ok(Json(tokens))
}

pub async fn signup(
    State(app_state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, HttpError> {
    let (username, password) = parse_credentials(body)?;

    app_state
        .auth_service
        .signup(&username, &password)
        .await
        .map_err(|e| HttpError::from_signup(e, username))?;

    Ok(StatusCode::CREATED)
}

pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
}
