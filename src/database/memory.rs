//! In-memory user store
//!
//! Used when no `DATABASE_URL` is configured. Usernames are claimed through
//! the map's entry API, so concurrent inserts of the same name cannot both win.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::auth::models::User;
use crate::services::errors::StoreError;
use crate::services::traits::{UserCreator, UserGetter};

#[derive(Debug)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
    next_id: AtomicI64,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserGetter for InMemoryUserStore {
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.users
            .get(username)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl UserCreator for InMemoryUserStore {
    async fn create_user(&self, mut user: User) -> Result<(), StoreError> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                user.id = self.next_id.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(user_id = user.id, "user stored in memory");
                slot.insert(user);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryUserStore::new();

        store.create_user(User::new("alice", "h1")).await.unwrap();
        store.create_user(User::new("bob", "h2")).await.unwrap();

        let alice = store.get_user_by_username("alice").await.unwrap();
        let bob = store.get_user_by_username("bob").await.unwrap();
        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(bob.password, "h2");
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = InMemoryUserStore::new();

        let result = store.get_user_by_username("ghost").await;

        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_of_same_username() {
        let store = Arc::new(InMemoryUserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.create_user(User::new("alice", format!("hash{i}"))).await
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => created += 1,
                Err(StoreError::Conflict) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(store.users.len(), 1);
    }
}
