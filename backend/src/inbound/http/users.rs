//! User CRUD handlers.
//!
//! Every endpoint is `POST` with a JSON body; identifiers travel in the body,
//! not the path.
//!
//! ```text
//! POST /users        (body ignored)
//! POST /user         {"user_id":"7df661d5-47e3-4533-baa6-5f952d18bffe"}
//! POST /create-user  {"user_id":"7df661d5-...","name":"John Doe","age":42}
//! POST /update-user  {"user_id":"7df661d5-...","name":"John Doe","age":43}
//! POST /delete-user  {"user_id":"7df661d5-47e3-4533-baa6-5f952d18bffe"}
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::UserPersistenceError;
use crate::domain::{User, UserId};

use super::error::{ApiError, ApiResult};
use super::request::{null_as_default, parse_request_body};
use super::response::write_json;
use super::state::HttpState;
use super::validation::{
    ValidationError, parse_user, parse_user_id, validate_identifier, validate_user_request,
};

/// Message returned when the addressed user does not exist.
pub const USER_NOT_FOUND: &str = "user not found";
/// Message returned when creating a user whose identifier is taken.
pub const USER_ALREADY_EXISTS: &str = "user already exists";

/// Body of `/user` and `/delete-user`.
///
/// Example JSON: `{"user_id":"7df661d5-47e3-4533-baa6-5f952d18bffe"}`
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserIdentifierRequest {
    /// Identifier of the addressed user.
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
}

impl TryFrom<UserIdentifierRequest> for UserId {
    type Error = Vec<ValidationError>;

    fn try_from(value: UserIdentifierRequest) -> Result<Self, Self::Error> {
        parse_user_id(&value.user_id).map_err(|err| vec![err])
    }
}

/// Body of `/create-user` and `/update-user`.
///
/// Example JSON: `{"user_id":"7df661d5-...","name":"John Doe","age":42}`
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserRequest {
    /// Identifier of the user.
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    /// Full replacement name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Full replacement age.
    #[serde(deserialize_with = "null_as_default")]
    pub age: i32,
}

impl TryFrom<UserRequest> for User {
    type Error = Vec<ValidationError>;

    fn try_from(value: UserRequest) -> Result<Self, Self::Error> {
        parse_user(&value.user_id, value.name, value.age)
    }
}

/// Envelope returned by `/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsersResponse {
    /// Every stored user, in storage order.
    pub users: Vec<User>,
}

/// Turn a non-empty validation report into a 422.
fn reject_invalid(errors: Vec<ValidationError>) -> ApiResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

/// Not-found is the only failure a lookup, update, or delete surfaces to
/// the client; everything else is a 500.
fn map_lookup_error(error: UserPersistenceError) -> ApiError {
    match error {
        UserPersistenceError::NotFound => ApiError::not_found(USER_NOT_FOUND),
        other => ApiError::internal(other),
    }
}

fn map_create_error(error: UserPersistenceError) -> ApiError {
    match error {
        UserPersistenceError::AlreadyExists => ApiError::conflict(USER_ALREADY_EXISTS),
        other => ApiError::internal(other),
    }
}

/// List every user.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use user_service::inbound::http::users::list_users;
///
/// let app = App::new().route("/users", web::post().to(list_users));
/// ```
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users.users().await.map_err(ApiError::internal)?;
    Ok(write_json(StatusCode::OK, &UsersResponse { users }))
}

/// Fetch one user by identifier.
pub async fn get_user(
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let request: UserIdentifierRequest = parse_request_body(payload).await?;
    reject_invalid(validate_identifier(&request.user_id))?;
    let user_id = UserId::try_from(request)?;

    let user = state.users.user(&user_id).await.map_err(map_lookup_error)?;
    Ok(write_json(StatusCode::OK, &user))
}

/// Create a user.
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let request: UserRequest = parse_request_body(payload).await?;
    reject_invalid(validate_user_request(
        &request.user_id,
        &request.name,
        request.age,
    ))?;
    let user = User::try_from(request)?;

    state
        .users
        .create_user(&user)
        .await
        .map_err(map_create_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace the name and age of an existing user.
pub async fn update_user(
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let request: UserRequest = parse_request_body(payload).await?;
    reject_invalid(validate_user_request(
        &request.user_id,
        &request.name,
        request.age,
    ))?;
    let user = User::try_from(request)?;

    state
        .users
        .update_user(&user)
        .await
        .map_err(map_lookup_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a user.
pub async fn delete_user(
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let request: UserIdentifierRequest = parse_request_body(payload).await?;
    reject_invalid(validate_identifier(&request.user_id))?;
    let user_id = UserId::try_from(request)?;

    state
        .users
        .delete_user(&user_id)
        .await
        .map_err(map_lookup_error)?;
    Ok(HttpResponse::NoContent().finish())
}
