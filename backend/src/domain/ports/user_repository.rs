//! Port abstraction for user persistence adapters and their errors.
//!
//! The [`UserRepository`] trait is the single storage capability the HTTP
//! handlers depend on. Each method maps to exactly one SQL statement in the
//! PostgreSQL adapter; there are no transactions and no retries.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// No row matched the requested identifier.
        NotFound => "user not found",
        /// A row with the same identifier already exists.
        AlreadyExists => "user already exists",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Port for user storage and retrieval.
///
/// Any backend implementing this capability set is substitutable, which is
/// how handler tests run without a database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch every stored user.
    ///
    /// Returns an empty vector when the table is empty. No ordering is
    /// guaranteed.
    async fn users(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] when no row matches.
    async fn user(&self, id: &UserId) -> Result<User, UserPersistenceError>;

    /// Insert a new user.
    ///
    /// Fails with [`UserPersistenceError::AlreadyExists`] when the identifier
    /// is already taken.
    async fn create_user(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace the name and age of an existing user.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] when no row was updated.
    async fn update_user(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a user.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] when no row was deleted.
    async fn delete_user(&self, id: &UserId) -> Result<(), UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the port error surface.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserPersistenceError::not_found(), "user not found")]
    #[case(UserPersistenceError::already_exists(), "user already exists")]
    #[case(
        UserPersistenceError::connection("pool timed out"),
        "user repository connection failed: pool timed out"
    )]
    #[case(
        UserPersistenceError::query("syntax error"),
        "user repository query failed: syntax error"
    )]
    fn errors_render_messages(#[case] error: UserPersistenceError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
