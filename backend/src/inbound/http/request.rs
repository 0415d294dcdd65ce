//! Request body decoding shared by the user handlers.

use actix_web::web;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::error::{ApiError, ApiResult};

/// Message returned when the request has no body.
pub const EMPTY_REQUEST_BODY: &str = "empty request body";
/// Message returned when the body is not valid JSON for the operation.
pub const INVALID_REQUEST_BODY: &str = "invalid request body";

/// Drain the request payload.
///
/// Transport failures while reading are internal errors.
async fn read_body(mut payload: web::Payload) -> ApiResult<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| ApiError::internal(format!("read request body: {err}")))?;
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Deserialize a field, reading JSON `null` as the type's zero value.
///
/// Pair with `#[serde(default)]` so absent and `null` fields behave alike.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decode the JSON body into `T`.
///
/// Unknown fields are ignored. Missing or `null` fields, and a bare `null`
/// body, fall back to zero values so validation reports them.
pub(crate) async fn parse_request_body<T>(payload: web::Payload) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    let body = read_body(payload).await?;
    if body.is_empty() {
        return Err(ApiError::bad_request(EMPTY_REQUEST_BODY));
    }
    decode_body(&body)
}

fn decode_body<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|err| {
            debug!(error = %err, "request body rejected");
            ApiError::bad_request(INVALID_REQUEST_BODY)
        })
}
