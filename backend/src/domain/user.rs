//! User data model.
//!
//! Every component of a [`User`] is validated on construction, so a value of
//! this type always satisfies the persisted row constraints.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Required byte length of a hyphenated UUID string.
pub const USER_ID_LENGTH: usize = 36;
/// Minimum allowed length for a user name, in characters.
pub const NAME_MIN: usize = 4;
/// Maximum allowed length for a user name, in characters.
pub const NAME_MAX: usize = 100;
/// Minimum allowed age.
pub const AGE_MIN: i32 = 1;

/// Validation errors returned by the user component constructors.
///
/// The `Display` output is the message surfaced to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier is not exactly [`USER_ID_LENGTH`] bytes long.
    #[error("invalid UUID length: {length}")]
    InvalidIdLength { length: usize },
    /// The identifier has the right length but is not a hyphenated UUID.
    #[error("invalid UUID format")]
    InvalidIdFormat,
    /// The name is shorter than [`NAME_MIN`] or longer than [`NAME_MAX`].
    #[error("invalid length exceeded - ({min}-{max})")]
    NameLength { min: usize, max: usize },
    /// The age is below [`AGE_MIN`].
    #[error("invalid min value exceeded - ({min})")]
    AgeTooLow { min: i32 },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its hyphenated string form.
    ///
    /// # Examples
    /// ```
    /// use user_service::domain::{UserId, UserValidationError};
    ///
    /// assert!(UserId::new("7df661d5-47e3-4533-baa6-5f952d18bffe").is_ok());
    /// assert_eq!(
    ///     UserId::new("u-1"),
    ///     Err(UserValidationError::InvalidIdLength { length: 3 })
    /// );
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.len() != USER_ID_LENGTH {
            return Err(UserValidationError::InvalidIdLength { length: id.len() });
        }

        Uuid::try_parse(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidIdFormat)
    }

    /// Wrap a UUID read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let length = name.chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&length) {
            return Err(UserValidationError::NameLength {
                min: NAME_MIN,
                max: NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// User age in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Age(i32);

impl Age {
    /// Validate and construct an [`Age`].
    pub fn new(age: i32) -> Result<Self, UserValidationError> {
        if age < AGE_MIN {
            return Err(UserValidationError::AgeTooLow { min: AGE_MIN });
        }
        Ok(Self(age))
    }

    /// Raw value as stored in the `age` column.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<Age> for i32 {
    fn from(value: Age) -> Self {
        value.0
    }
}

impl TryFrom<i32> for Age {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// Serialised as `{"user_id": "<uuid>", "name": "<string>", "age": <int>}`.
///
/// ## Invariants
/// - `user_id` is a hyphenated UUID.
/// - `name` is between [`NAME_MIN`] and [`NAME_MAX`] characters.
/// - `age` is at least [`AGE_MIN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    user_id: UserId,
    name: UserName,
    age: Age,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(user_id: UserId, name: UserName, age: Age) -> Self {
        Self { user_id, name, age }
    }

    /// Fallible constructor enforcing every component invariant.
    ///
    /// Stops at the first invalid component; use the HTTP validation helpers
    /// when every failure must be reported.
    pub fn try_from_parts(
        user_id: impl AsRef<str>,
        name: impl Into<String>,
        age: i32,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            UserId::new(user_id)?,
            UserName::new(name)?,
            Age::new(age)?,
        ))
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.user_id
    }

    /// User name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// User age.
    pub fn age(&self) -> Age {
        self.age
    }
}
