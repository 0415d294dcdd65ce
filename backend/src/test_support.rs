//! Test utilities for the user service crate.
//!
//! Compiled for unit tests and for integration tests through the
//! `test-support` feature.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

#[derive(Default)]
struct Store {
    users: HashMap<UserId, User>,
    failure: Option<UserPersistenceError>,
}

/// In-memory [`UserRepository`] mirroring the PostgreSQL adapter's outcomes.
///
/// # Examples
/// ```
/// use user_service::domain::User;
/// use user_service::domain::ports::UserRepository;
/// use user_service::test_support::InMemoryUserRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = InMemoryUserRepository::default();
/// let user = User::try_from_parts("7df661d5-47e3-4533-baa6-5f952d18bffe", "John Doe", 42)
///     .expect("valid user");
/// repo.create_user(&user).await.expect("insert");
/// assert_eq!(repo.user(user.id()).await.expect("lookup"), user);
/// # });
/// ```
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
}

impl InMemoryUserRepository {
    /// Seed the repository with `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|user| (*user.id(), user)).collect();
        Self {
            store: Mutex::new(Store {
                users,
                failure: None,
            }),
        }
    }

    /// Make every subsequent call fail with `failure`, or succeed again with
    /// `None`.
    pub fn set_failure(&self, failure: Option<UserPersistenceError>) {
        if let Ok(mut store) = self.store.lock() {
            store.failure = failure;
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, UserPersistenceError> {
        let store = self
            .store
            .lock()
            .map_err(|_| UserPersistenceError::connection("in-memory store poisoned"))?;
        match &store.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(store),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn users(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.store()?.users.values().cloned().collect())
    }

    async fn user(&self, id: &UserId) -> Result<User, UserPersistenceError> {
        self.store()?
            .users
            .get(id)
            .cloned()
            .ok_or(UserPersistenceError::NotFound)
    }

    async fn create_user(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut store = self.store()?;
        if store.users.contains_key(user.id()) {
            return Err(UserPersistenceError::AlreadyExists);
        }
        store.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut store = self.store()?;
        let stored = store
            .users
            .get_mut(user.id())
            .ok_or(UserPersistenceError::NotFound)?;
        *stored = user.clone();
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        self.store()?
            .users
            .remove(id)
            .map(|_| ())
            .ok_or(UserPersistenceError::NotFound)
    }
}
