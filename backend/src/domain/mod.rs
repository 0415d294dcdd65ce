//! Domain primitives and ports.
//!
//! Purpose: define the strongly typed user entity shared by the HTTP and
//! persistence adapters, plus the port traits those adapters implement.
//!
//! Public surface:
//! - User: validated user entity.
//! - UserId, UserName, Age: validated user components.
//! - UserValidationError: constructor failures with client-facing messages.

pub mod ports;
pub mod user;

pub use self::user::{
    AGE_MIN, Age, NAME_MAX, NAME_MIN, USER_ID_LENGTH, User, UserId, UserName, UserValidationError,
};
