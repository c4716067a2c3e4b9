use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderMap, header},
};
use validator::Validate;

use crate::error::AppError;

/// A JSON body as the handler receives it: parsed, or the reason it was not.
///
/// Taking the body this way lets a handler log the attempt before deciding
/// whether the input is acceptable.
pub type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Unwrap a [`JsonBody`] and run its `validator` rules.
///
/// Malformed JSON and failed rules are both rejected with 400.
pub fn validated<T: Validate>(body: JsonBody<T>) -> Result<T, AppError> {
    let Json(value) =
        body.map_err(|e| AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e)))?;

    value.validate()?;

    Ok(value)
}

/// Credential from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively; an empty credential counts as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}
