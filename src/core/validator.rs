//! Request validation: content type enforcement and payload decoding.
//!
//! Field-presence checks belong to the payload types in
//! [`crate::core::request`].
use axum::body::Body;
use bytes::Bytes;
use http::{HeaderMap, header};
use serde::de::DeserializeOwned;

use crate::core::error::{GatewayError, GatewayResult};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// True when the declared media type is `application/json`.
///
/// Parameters such as `charset` are ignored.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
}

/// Drain the request body and accept it only if it was declared as JSON.
///
/// The body is consumed exactly once whatever the outcome, so the
/// connection is never left with unread input.
pub async fn validate_post_data(
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> GatewayResult<Bytes> {
    let drained = axum::body::to_bytes(body, limit).await;

    if !is_json_content_type(headers) {
        return Err(GatewayError::UnsupportedContentType);
    }

    drained.map_err(|e| GatewayError::BadRequest(format!("unreadable body: {e}")))
}

/// Decode a validated payload into its request type.
pub fn parse_payload<T: DeserializeOwned>(payload: &[u8]) -> GatewayResult<T> {
    serde_json::from_slice(payload).map_err(|e| GatewayError::BadRequest(e.to_string()))
}
