//! Routing table for the user endpoints.
//!
//! ```text
//! POST /users        list_users
//! POST /user         get_user
//! POST /create-user  create_user
//! POST /update-user  update_user
//! POST /delete-user  delete_user
//! ```
//!
//! Each path is registered as a resource so a matched path with any other
//! method answers `405 Method Not Allowed`; unmatched paths fall through to
//! Actix's default `404 Not Found`.

use actix_web::web;

use super::users::{create_user, delete_user, get_user, list_users, update_user};

/// Path of the list endpoint.
pub const USERS_PATH: &str = "/users";
/// Path of the single-user lookup endpoint.
pub const USER_PATH: &str = "/user";
/// Path of the create endpoint.
pub const CREATE_USER_PATH: &str = "/create-user";
/// Path of the update endpoint.
pub const UPDATE_USER_PATH: &str = "/update-user";
/// Path of the delete endpoint.
pub const DELETE_USER_PATH: &str = "/delete-user";

/// Register every user route on the service config.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::routes::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(USERS_PATH).route(web::post().to(list_users)))
        .service(web::resource(USER_PATH).route(web::post().to(get_user)))
        .service(web::resource(CREATE_USER_PATH).route(web::post().to(create_user)))
        .service(web::resource(UPDATE_USER_PATH).route(web::post().to(update_user)))
        .service(web::resource(DELETE_USER_PATH).route(web::post().to(delete_user)));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::inbound::http::state::HttpState;
    use actix_web::http::{Method, StatusCode};
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    async fn status_of(method: Method, uri: &str) -> StatusCode {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::new(Arc::new(
                    MockUserRepository::new(),
                ))))
                .configure(configure),
        )
        .await;
        let request = actix_test::TestRequest::default()
            .method(method)
            .uri(uri)
            .to_request();
        actix_test::call_service(&app, request).await.status()
    }

    #[rstest]
    #[actix_web::test]
    async fn wrong_method_on_known_path_is_not_allowed(
        #[values(USERS_PATH, USER_PATH, CREATE_USER_PATH, UPDATE_USER_PATH, DELETE_USER_PATH)]
        path: &str,
        #[values(Method::GET, Method::PUT, Method::DELETE, Method::PATCH)] method: Method,
    ) {
        assert_eq!(status_of(method, path).await, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[rstest]
    #[case(Method::POST, "/")]
    #[case(Method::POST, "/unknown")]
    #[case(Method::POST, "/users/extra")]
    #[case(Method::GET, "/api/v1/users")]
    #[actix_web::test]
    async fn unknown_path_is_not_found(#[case] method: Method, #[case] path: &str) {
        assert_eq!(status_of(method, path).await, StatusCode::NOT_FOUND);
    }
}
