use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Path segment of the POST lookup routes
pub const LOOKUP_SEGMENT: &str = "lookup";

/// Pull a non-empty string `token` out of a lookup body
pub fn token_from_body(body: Result<Json<Value>, JsonRejection>) -> Result<String, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e.body_text())))?;

    match body.get("token") {
        Some(Value::String(token)) if !token.trim().is_empty() => Ok(token.clone()),
        Some(Value::String(_)) => Err(ApiError::bad_request("Token must not be empty")),
        Some(_) => Err(ApiError::bad_request("Token must be a string")),
        None => Err(ApiError::bad_request("Token is required")),
    }
}
