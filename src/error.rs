use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::utils::error_response;

/// Rejection of one intake; the `Display` text is what the submitter sees
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("{message}")]
    BadRequest {
        field: Option<&'static str>,
        message: String,
    },

    #[error("{message}")]
    ValidationFailed { field: &'static str, message: String },

    #[error("Too many registration attempts. Please try again later.")]
    RateLimited,

    #[error("{message}")]
    Conflict { field: &'static str, message: String },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Registration failed. Please try again later.")]
    InternalError,
}

impl IntakeError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        IntakeError::BadRequest {
            field: None,
            message: message.into(),
        }
    }

    pub fn bad_field(field: &'static str, message: impl Into<String>) -> Self {
        IntakeError::BadRequest {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::BadRequest { .. } | IntakeError::ValidationFailed { .. } => {
                StatusCode::BAD_REQUEST
            }
            IntakeError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            IntakeError::Conflict { .. } => StatusCode::CONFLICT,
            IntakeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            IntakeError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Field hint; only field-level rejections carry one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            IntakeError::BadRequest { field, .. } => *field,
            IntakeError::ValidationFailed { field, .. } | IntakeError::Conflict { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            IntakeError::BadRequest { .. } => "bad_request",
            IntakeError::ValidationFailed { .. } => "validation_failed",
            IntakeError::RateLimited => "rate_limited",
            IntakeError::Conflict { .. } => "conflict",
            IntakeError::MethodNotAllowed => "method_not_allowed",
            IntakeError::InternalError => "internal_error",
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.field(), &self.to_string())
    }
}
