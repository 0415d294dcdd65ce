//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Age, User, UserId, UserName, UserValidationError};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: Uuid,
    pub name: String,
    pub age: i32,
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::new(
            UserId::from_uuid(row.user_id),
            UserName::new(row.name)?,
            Age::new(row.age)?,
        ))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub age: i32,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            user_id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            age: user.age().get(),
        }
    }
}

/// Changeset replacing every mutable column of a user record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub age: i32,
}

impl<'a> From<&'a User> for UserUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: user.name().as_ref(),
            age: user.age().get(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Conversion coverage between rows and domain users.
    use super::*;
    use rstest::rstest;

    const ID: &str = "7df661d5-47e3-4533-baa6-5f952d18bffe";

    #[rstest]
    fn row_converts_to_domain_user() {
        let row = UserRow {
            user_id: Uuid::parse_str(ID).expect("valid uuid"),
            name: "John Doe".to_owned(),
            age: 42,
        };

        let user = User::try_from(row).expect("row is valid");

        assert_eq!(user, User::try_from_parts(ID, "John Doe", 42).expect("user"));
    }

    #[rstest]
    fn row_with_invalid_age_is_rejected() {
        let row = UserRow {
            user_id: Uuid::nil(),
            name: "John Doe".to_owned(),
            age: 0,
        };

        assert_eq!(
            User::try_from(row),
            Err(UserValidationError::AgeTooLow { min: 1 })
        );
    }

    #[rstest]
    fn insert_and_update_rows_borrow_domain_values() {
        let user = User::try_from_parts(ID, "John Doe", 42).expect("user");

        let insert = NewUserRow::from(&user);
        let update = UserUpdate::from(&user);

        assert_eq!(insert.user_id.to_string(), ID);
        assert_eq!((insert.name, insert.age), ("John Doe", 42));
        assert_eq!((update.name, update.age), ("John Doe", 42));
    }
}
