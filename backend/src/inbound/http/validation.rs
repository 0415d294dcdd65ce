//! Field validation for inbound user payloads.
//!
//! Validation never short-circuits: every failing field is reported, in the
//! order `user_id`, `name`, `age`, so one 422 response carries them all.

use serde::Serialize;

use crate::domain::{Age, User, UserId, UserName, UserValidationError};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const USER_ID: FieldName = FieldName::new("user_id");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const AGE: FieldName = FieldName::new("age");

/// One failed field constraint, serialised as `{"path": .., "message": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// JSON field the failure refers to.
    pub path: String,
    /// Client-facing description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Build a validation error for the given path.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    fn for_field(field: FieldName, error: &UserValidationError) -> Self {
        Self::new(field.as_str(), error.to_string())
    }
}

/// Check that `user_id` is a hyphenated UUID.
///
/// # Examples
/// ```
/// use user_service::inbound::http::validation::{ValidationError, validate_identifier};
///
/// assert!(validate_identifier("7df661d5-47e3-4533-baa6-5f952d18bffe").is_empty());
/// assert_eq!(
///     validate_identifier("u-1"),
///     vec![ValidationError::new("user_id", "invalid UUID length: 3")]
/// );
/// ```
pub fn validate_identifier(user_id: &str) -> Vec<ValidationError> {
    parse_user_id(user_id).err().into_iter().collect()
}

/// Check every field of a create or update payload.
pub fn validate_user_request(user_id: &str, name: &str, age: i32) -> Vec<ValidationError> {
    parse_user(user_id, name, age).err().unwrap_or_default()
}

pub(crate) fn parse_user_id(user_id: &str) -> Result<UserId, ValidationError> {
    UserId::new(user_id).map_err(|err| ValidationError::for_field(USER_ID, &err))
}

pub(crate) fn parse_user(
    user_id: &str,
    name: impl Into<String>,
    age: i32,
) -> Result<User, Vec<ValidationError>> {
    let user_id = parse_user_id(user_id);
    let name = UserName::new(name).map_err(|err| ValidationError::for_field(NAME, &err));
    let age = Age::new(age).map_err(|err| ValidationError::for_field(AGE, &err));

    match (user_id, name, age) {
        (Ok(user_id), Ok(name), Ok(age)) => Ok(User::new(user_id, name, age)),
        (user_id, name, age) => Err([user_id.err(), name.err(), age.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}
