//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;

async fn body_of(error: &ApiError) -> (StatusCode, String) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    (
        status,
        String::from_utf8(bytes.to_vec()).expect("utf8 body"),
    )
}

#[rstest]
#[case(ApiError::bad_request("x"), StatusCode::BAD_REQUEST)]
#[case(ApiError::not_found("x"), StatusCode::NOT_FOUND)]
#[case(ApiError::conflict("x"), StatusCode::CONFLICT)]
#[case(ApiError::from(Vec::new()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ApiError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_variant(#[case] error: ApiError, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn status_and_body_agree() {
    let errors = [
        ApiError::bad_request("empty request body"),
        ApiError::not_found("user not found"),
        ApiError::conflict("user already exists"),
        ApiError::from(vec![ValidationError::new("user_id", "invalid UUID format")]),
    ];

    for error in errors {
        let (status, _) = body_of(&error).await;
        assert_eq!(status, ResponseError::status_code(&error));
    }
}

#[rstest]
#[actix_web::test]
async fn client_errors_carry_message() {
    let (status, body) = body_of(&ApiError::conflict("user already exists")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, r#"{"error":"user already exists"}"#);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = ApiError::internal("connection refused by 10.0.0.5:5432");

    let (status, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
    assert!(error.to_string().contains("connection refused"));
}
