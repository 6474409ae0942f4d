//! Signup use case: uniqueness check, then hashing, then user creation.
//!
//! The uniqueness check is advisory. Two concurrent signups for the same
//! username can both pass it; the store is expected to reject the second
//! insert with [`StoreError::Conflict`], which is reported as `Duplicate`.

use crate::auth::models::User;
use crate::services::errors::{SignupError, StoreError};
use crate::services::traits::{PasswordHasher, UserCreator, UserGetter};

/// Collaborators for [`signup`]
#[derive(Clone, Copy)]
pub struct SignupDependencies<'a> {
    pub user_getter: &'a dyn UserGetter,
    pub pass_hasher: &'a dyn PasswordHasher,
    pub user_creator: &'a dyn UserCreator,
}

/// Register a new user with a hashed password.
pub async fn signup(
    deps: SignupDependencies<'_>,
    username: &str,
    password: &str,
) -> Result<(), SignupError> {
    check_username_is_unique(deps.user_getter, username).await?;
    let hashed = hash_password(deps.pass_hasher, password)?;
    create_user(deps.user_creator, username, hashed).await
}

async fn check_username_is_unique(
    user_getter: &dyn UserGetter,
    username: &str,
) -> Result<(), SignupError> {
    match user_getter.get_user_by_username(username).await {
        Ok(_) => {
            tracing::info!(%username, "signup rejected: username taken");
            Err(SignupError::Duplicate)
        }
        Err(StoreError::NotFound) => Ok(()),
        Err(e) => {
            tracing::error!(%username, error = %e, "signup: user lookup failed");
            Err(SignupError::Internal)
        }
    }
}

fn hash_password(pass_hasher: &dyn PasswordHasher, password: &str) -> Result<String, SignupError> {
    pass_hasher.hash_password(password).map_err(|e| {
        tracing::error!(error = %e, "signup: password hashing failed");
        SignupError::Internal
    })
}

async fn create_user(
    user_creator: &dyn UserCreator,
    username: &str,
    hashed: String,
) -> Result<(), SignupError> {
    match user_creator.create_user(User::new(username, hashed)).await {
        Ok(()) => {
            tracing::info!(%username, "signup succeeded");
            Ok(())
        }
        Err(StoreError::Conflict) => {
            tracing::warn!(%username, "signup rejected by store: username taken");
            Err(SignupError::Duplicate)
        }
        Err(e) => {
            tracing::error!(%username, error = %e, "signup: user creation failed");
            Err(SignupError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::services::fakes::*;

    #[tokio::test]
    async fn test_signup_creates_user_with_hashed_password() {
        let user_getter = MockUserGetter::new();
        let pass_hasher = MockPasswordHasher::default();
        let user_creator = MockUserCreator::default();
        let deps = SignupDependencies {
            user_getter: &user_getter,
            pass_hasher: &pass_hasher,
            user_creator: &user_creator,
        };

        signup(deps, "newuser", "supersecret").await.unwrap();

        let created = user_creator.created.lock().unwrap();
        assert_eq!(
            *created,
            vec![User {
                id: 7,
                username: "newuser".to_string(),
                password: "supersecretfoo".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_existing_username_is_duplicate_before_hashing() {
        let user_getter = MockUserGetter::with_users(vec![User {
            id: 4,
            username: "alice".to_string(),
            password: mock_hash("old"),
        }]);
        let pass_hasher = MockPasswordHasher::default();
        let user_creator = MockUserCreator::default();
        let deps = SignupDependencies {
            user_getter: &user_getter,
            pass_hasher: &pass_hasher,
            user_creator: &user_creator,
        };

        let result = signup(deps, "alice", "pw").await;

        assert_eq!(result, Err(SignupError::Duplicate));
        assert_eq!(pass_hasher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(user_creator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_user_getter_is_internal() {
        let pass_hasher = MockPasswordHasher::default();
        let user_creator = MockUserCreator::default();
        let deps = SignupDependencies {
            user_getter: &BadUserGetter,
            pass_hasher: &pass_hasher,
            user_creator: &user_creator,
        };

        let result = signup(deps, "newuser", "supersecret").await;

        assert_eq!(result, Err(SignupError::Internal));
        assert_eq!(pass_hasher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(user_creator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_hasher_never_creates_user() {
        let user_getter = MockUserGetter::new();
        let user_creator = MockUserCreator::default();
        let deps = SignupDependencies {
            user_getter: &user_getter,
            pass_hasher: &BadPasswordHasher,
            user_creator: &user_creator,
        };

        let result = signup(deps, "newuser", "supersecret").await;

        assert_eq!(result, Err(SignupError::Internal));
        assert_eq!(user_creator.calls.load(Ordering::SeqCst), 0);
        assert!(user_creator.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_user_creator_is_internal() {
        let user_getter = MockUserGetter::new();
        let pass_hasher = MockPasswordHasher::default();
        let deps = SignupDependencies {
            user_getter: &user_getter,
            pass_hasher: &pass_hasher,
            user_creator: &BadUserCreator,
        };

        let result = signup(deps, "newuser", "supersecret").await;

        assert_eq!(result, Err(SignupError::Internal));
    }

    #[tokio::test]
    async fn test_store_conflict_is_duplicate() {
        let user_getter = MockUserGetter::new();
        let pass_hasher = MockPasswordHasher::default();
        let deps = SignupDependencies {
            user_getter: &user_getter,
            pass_hasher: &pass_hasher,
            user_creator: &ConflictingUserCreator,
        };

        let result = signup(deps, "newuser", "supersecret").await;

        assert_eq!(result, Err(SignupError::Duplicate));
    }
}
