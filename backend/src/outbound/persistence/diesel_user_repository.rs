//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Every port method issues exactly one statement against
//! `user_service.users`. Missing rows surface as
//! [`UserPersistenceError::NotFound`] and duplicate inserts as
//! [`UserPersistenceError::AlreadyExists`]; all other driver failures are
//! passed up with the driver's message.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Message prefix PostgreSQL uses for unique constraint violations.
const UNIQUE_VIOLATION_PREFIX: &str = "duplicate key value violates unique constraint";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            UserPersistenceError::connection(info.message())
        }
        other => UserPersistenceError::query(other.to_string()),
    }
}

/// Detect a uniqueness violation reported by the driver.
///
/// Prefers the structured error kind; the message prefix covers drivers that
/// only report the server text.
fn is_unique_violation(error: &DieselError) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => true,
        DieselError::DatabaseError(_, info) => info.message().starts_with(UNIQUE_VIOLATION_PREFIX),
        _ => false,
    }
}

fn map_insert_error(error: DieselError) -> UserPersistenceError {
    if is_unique_violation(&error) {
        debug!("user insert rejected by unique constraint");
        return UserPersistenceError::already_exists();
    }
    map_diesel_error(error)
}

/// Rows written outside the service may break the domain invariants; those
/// are logged with their id and fail the call.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let user_id = row.user_id;
    User::try_from(row).map_err(|err| {
        warn!(%user_id, error = %err, "stored user row fails validation");
        UserPersistenceError::query(format!("stored user {user_id} is invalid: {err}"))
    })
}

fn require_affected(rows: usize) -> Result<(), UserPersistenceError> {
    if rows == 0 {
        return Err(UserPersistenceError::not_found());
    }
    Ok(())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn users(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn user(&self, id: &UserId) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map_or_else(|| Err(UserPersistenceError::not_found()), row_to_user)
    }

    async fn create_user(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        diesel::insert_into(users::table)
            .values(&NewUserRow::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn update_user(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let updated = diesel::update(users::table.find(*user.id().as_uuid()))
            .set(&UserUpdate::from(user))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        require_affected(updated)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        require_affected(deleted)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for driver error mapping.
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn database_error(kind: DatabaseErrorKind, message: &str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(message.to_owned()))
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, UserPersistenceError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let repo_err = map_diesel_error(database_error(
            DatabaseErrorKind::ClosedConnection,
            "server closed the connection unexpectedly",
        ));

        assert_eq!(
            repo_err,
            UserPersistenceError::connection("server closed the connection unexpectedly")
        );
    }

    #[rstest]
    fn other_errors_keep_driver_message() {
        let repo_err = map_diesel_error(database_error(
            DatabaseErrorKind::Unknown,
            "relation \"user_service.users\" does not exist",
        ));

        assert!(matches!(repo_err, UserPersistenceError::Query { .. }));
        assert!(repo_err.to_string().contains("does not exist"));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::UniqueViolation, "users_pkey"), true)]
    #[case(
        database_error(
            DatabaseErrorKind::Unknown,
            "duplicate key value violates unique constraint \"users_pkey\""
        ),
        true
    )]
    #[case(database_error(DatabaseErrorKind::CheckViolation, "age_check"), false)]
    #[case(DieselError::NotFound, false)]
    fn unique_violation_detection(#[case] error: DieselError, #[case] expected: bool) {
        assert_eq!(is_unique_violation(&error), expected);
    }

    #[rstest]
    fn insert_unique_violation_maps_to_already_exists() {
        let repo_err = map_insert_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint \"users_pkey\"",
        ));

        assert_eq!(repo_err, UserPersistenceError::AlreadyExists);
    }

    #[rstest]
    fn insert_other_failure_maps_to_query_error() {
        let repo_err = map_insert_error(database_error(DatabaseErrorKind::Unknown, "disk full"));

        assert_eq!(repo_err, UserPersistenceError::query("disk full"));
    }

    #[rstest]
    #[case(0, Err(UserPersistenceError::NotFound))]
    #[case(1, Ok(()))]
    fn affected_rows_decide_not_found(
        #[case] rows: usize,
        #[case] expected: Result<(), UserPersistenceError>,
    ) {
        assert_eq!(require_affected(rows), expected);
    }

    #[rstest]
    fn invalid_stored_rows_surface_as_query_errors() {
        let row = UserRow {
            user_id: Uuid::nil(),
            name: "Al".to_owned(),
            age: 30,
        };

        let err = row_to_user(row).expect_err("short name is invalid");

        assert_eq!(
            err,
            UserPersistenceError::query(
                "stored user 00000000-0000-0000-0000-000000000000 is invalid: \
                 invalid length exceeded - (4-100)"
            )
        );
    }
}
