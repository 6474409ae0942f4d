//! Login use case: lookup, then password check, then token issuance.

use crate::auth::models::{LoginTokens, User};
use crate::services::errors::{LoginError, StoreError};
use crate::services::traits::{PasswordMatcher, TokenGenerator, UserGetter};

/// Collaborators for [`login`]
#[derive(Clone, Copy)]
pub struct LoginDependencies<'a> {
    pub user_getter: &'a dyn UserGetter,
    pub pass_matcher: &'a dyn PasswordMatcher,
    pub token_generator: &'a dyn TokenGenerator,
}

/// Verify the credentials and issue a token pair.
///
/// Stops at the first failing step. The password is never checked for a
/// username that does not resolve.
pub async fn login(
    deps: LoginDependencies<'_>,
    username: &str,
    password: &str,
) -> Result<LoginTokens, LoginError> {
    let user = get_user(deps.user_getter, username).await?;
    verify_password(deps.pass_matcher, password, &user)?;
    generate_tokens(deps.token_generator, &user)
}

async fn get_user(user_getter: &dyn UserGetter, username: &str) -> Result<User, LoginError> {
    match user_getter.get_user_by_username(username).await {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound) => {
            tracing::info!(%username, "login rejected: unknown user");
            Err(LoginError::NotFound)
        }
        Err(e) => {
            tracing::error!(%username, error = %e, "login: user lookup failed");
            Err(LoginError::Internal)
        }
    }
}

fn verify_password(
    pass_matcher: &dyn PasswordMatcher,
    password: &str,
    user: &User,
) -> Result<(), LoginError> {
    let matches = pass_matcher
        .match_password(password, &user.password)
        .map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "login: password check failed");
            LoginError::Internal
        })?;

    if !matches {
        tracing::info!(user_id = user.id, "login rejected: incorrect password");
        return Err(LoginError::BadPassword);
    }
    Ok(())
}

fn generate_tokens(
    token_generator: &dyn TokenGenerator,
    user: &User,
) -> Result<LoginTokens, LoginError> {
    let tokens = token_generator
        .generate_tokens(user.id, &user.username)
        .map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "login: token generation failed");
            LoginError::Internal
        })?;

    tracing::info!(user_id = user.id, "login succeeded");
    Ok(tokens)
}
