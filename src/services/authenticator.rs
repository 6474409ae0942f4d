//! Wires concrete collaborators into the login and signup use cases.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::models::LoginTokens;
use crate::services::errors::{LoginError, SignupError};
use crate::services::login::{LoginDependencies, login};
use crate::services::signup::{SignupDependencies, signup};
use crate::services::traits::{
    AuthService, PasswordHasher, PasswordMatcher, TokenGenerator, UserCreator, UserGetter,
};

/// [`AuthService`] backed by shared collaborators
#[derive(Clone)]
pub struct Authenticator {
    user_getter: Arc<dyn UserGetter>,
    user_creator: Arc<dyn UserCreator>,
    pass_hasher: Arc<dyn PasswordHasher>,
    pass_matcher: Arc<dyn PasswordMatcher>,
    token_generator: Arc<dyn TokenGenerator>,
}

impl Authenticator {
    /// Build from one store serving both lookups and inserts, and one
    /// password implementation serving both hashing and matching.
    pub fn new<S, P, T>(store: Arc<S>, passwords: Arc<P>, token_generator: Arc<T>) -> Self
    where
        S: UserGetter + UserCreator + 'static,
        P: PasswordHasher + PasswordMatcher + 'static,
        T: TokenGenerator + 'static,
    {
        Self {
            user_getter: store.clone(),
            user_creator: store,
            pass_hasher: passwords.clone(),
            pass_matcher: passwords,
            token_generator,
        }
    }

    fn login_deps(&self) -> LoginDependencies<'_> {
        LoginDependencies {
            user_getter: self.user_getter.as_ref(),
            pass_matcher: self.pass_matcher.as_ref(),
            token_generator: self.token_generator.as_ref(),
        }
    }

    fn signup_deps(&self) -> SignupDependencies<'_> {
        SignupDependencies {
            user_getter: self.user_getter.as_ref(),
            pass_hasher: self.pass_hasher.as_ref(),
            user_creator: self.user_creator.as_ref(),
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, username: &str, password: &str) -> Result<LoginTokens, LoginError> {
        login(self.login_deps(), username, password).await
    }

    async fn signup(&self, username: &str, password: &str) -> Result<(), SignupError> {
        signup(self.signup_deps(), username, password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{JwtService, Secrets};
    use crate::auth::password::Argon2Hasher;
    use crate::database::memory::InMemoryUserStore;

    fn authenticator() -> (Authenticator, Arc<JwtService>) {
        let jwt_service = Arc::new(JwtService::with_system_clock(&Secrets {
            access: "access-secret".to_string(),
            refresh: "refresh-secret".to_string(),
        }));
        let service = Authenticator::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(Argon2Hasher::new()),
            jwt_service.clone(),
        );
        (service, jwt_service)
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let (service, jwt_service) = authenticator();

        service.signup("johndoe", "pw").await.unwrap();
        let tokens = service.login("johndoe", "pw").await.unwrap();

        let claims = jwt_service.verify_access_token(&tokens.access_token).unwrap();
        assert_eq!(claims.username, "johndoe");
        assert_eq!(claims.user_id, 1);
        let refresh = jwt_service.verify_refresh_token(&tokens.refresh_token).unwrap();
        assert_eq!(refresh.iat, claims.iat);
    }

    #[tokio::test]
    async fn test_signup_twice_is_duplicate() {
        let (service, _) = authenticator();

        service.signup("alice", "pw").await.unwrap();

        assert_eq!(service.signup("alice", "other").await, Err(SignupError::Duplicate));
    }

    #[tokio::test]
    async fn test_login_errors() {
        let (service, _) = authenticator();
        service.signup("alice", "pw").await.unwrap();

        assert_eq!(service.login("bob", "pw").await, Err(LoginError::NotFound));
        assert_eq!(service.login("alice", "nope").await, Err(LoginError::BadPassword));
    }
}
