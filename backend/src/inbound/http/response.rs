//! JSON response writers.
//!
//! Every response with a body is JSON with `Content-Type: application/json`.
//! Internal failures are logged and answered with an empty 500 so no error
//! detail reaches the client.

use std::fmt::Display;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use serde::Serialize;
use tracing::error;

use super::validation::ValidationError;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct ValidationErrorsBody<'a> {
    errors: &'a [ValidationError],
}

/// Serialise `body` and send it with `status`.
///
/// If serialisation fails the intended status is dropped and an empty 500 is
/// sent instead.
pub fn write_json<T>(status: StatusCode, body: &T) -> HttpResponse
where
    T: Serialize + ?Sized,
{
    match serde_json::to_vec(body) {
        Ok(content) => HttpResponse::build(status)
            .content_type(ContentType::json())
            .body(content),
        Err(err) => write_internal_server_error(&err),
    }
}

/// `400 {"error": message}`.
pub fn write_bad_request(message: &str) -> HttpResponse {
    write_json(StatusCode::BAD_REQUEST, &ErrorBody { error: message })
}

/// `404 {"error": message}`.
pub fn write_not_found(message: &str) -> HttpResponse {
    write_json(StatusCode::NOT_FOUND, &ErrorBody { error: message })
}

/// `409 {"error": message}`.
pub fn write_conflict(message: &str) -> HttpResponse {
    write_json(StatusCode::CONFLICT, &ErrorBody { error: message })
}

/// `422 {"errors": [{"path": .., "message": ..}, ..]}`, even for an empty list.
pub fn write_unprocessable_entities(errors: &[ValidationError]) -> HttpResponse {
    write_json(
        StatusCode::UNPROCESSABLE_ENTITY,
        &ValidationErrorsBody { errors },
    )
}

/// Log `err` and send an empty 500.
pub fn write_internal_server_error(err: &dyn Display) -> HttpResponse {
    error!(error = %err, "internal server error");
    HttpResponse::InternalServerError().finish()
}

#[cfg(test)]
mod tests {
    //! Response shape coverage.
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::header::CONTENT_TYPE;
    use rstest::rstest;
    use serde::Serializer;

    struct Unserialisable;

    impl Serialize for Unserialisable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("boom"))
        }
    }

    async fn body_of(response: HttpResponse) -> String {
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    fn content_type(response: &HttpResponse) -> Option<&str> {
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    #[rstest]
    #[case(
        write_bad_request("invalid request body"),
        StatusCode::BAD_REQUEST,
        r#"{"error":"invalid request body"}"#
    )]
    #[case(
        write_not_found("user not found"),
        StatusCode::NOT_FOUND,
        r#"{"error":"user not found"}"#
    )]
    #[case(
        write_conflict("user already exists"),
        StatusCode::CONFLICT,
        r#"{"error":"user already exists"}"#
    )]
    #[actix_web::test]
    async fn error_writers_wrap_message(
        #[case] response: HttpResponse,
        #[case] status: StatusCode,
        #[case] body: &str,
    ) {
        assert_eq!(response.status(), status);
        assert_eq!(content_type(&response), Some("application/json"));
        assert_eq!(body_of(response).await, body);
    }

    #[rstest]
    #[actix_web::test]
    async fn unprocessable_entities_lists_every_error() {
        let errors = [
            ValidationError::new("user_id", "invalid UUID length: 3"),
            ValidationError::new("age", "invalid min value exceeded - (1)"),
        ];

        let response = write_unprocessable_entities(&errors);

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_of(response).await,
            concat!(
                r#"{"errors":[{"path":"user_id","message":"invalid UUID length: 3"},"#,
                r#"{"path":"age","message":"invalid min value exceeded - (1)"}]}"#,
            )
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn unprocessable_entities_keeps_status_for_empty_list() {
        let response = write_unprocessable_entities(&[]);

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_of(response).await, r#"{"errors":[]}"#);
    }

    #[rstest]
    #[actix_web::test]
    async fn serialisation_failure_becomes_empty_internal_error() {
        let response = write_json(StatusCode::OK, &Unserialisable);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type(&response), None);
        assert_eq!(body_of(response).await, "");
    }

    #[rstest]
    #[actix_web::test]
    async fn internal_server_error_hides_detail() {
        let response = write_internal_server_error(&"password authentication failed");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, "");
    }
}
