use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub mod code;
pub mod rate_limit;
pub mod validation;

/// Helper to create the failure envelope
pub fn error_response(status: StatusCode, field: Option<&str>, message: &str) -> Response {
    let error = match field {
        Some(field) => json!({"field": field, "message": message}),
        None => json!({"message": message}),
    };
    (status, Json(json!({"success": false, "error": error}))).into_response()
}

/// Helper to create the success envelope
pub fn success_response<T: serde::Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({"success": true, "data": data}))).into_response()
}
