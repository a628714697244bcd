//! Mapping of core errors to HTTP responses.

use crate::dto::MessageBody;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medlink_core::{PatientError, ValidationErrors};
use std::collections::BTreeMap;

/// Error returned by REST handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level payload problems; rendered as a field -> message object.
    Validation(ValidationErrors),
    /// Undecodable body or malformed path parameter.
    BadRequest(String),
    NotFound(String),
    /// Email held by another patient. Reported as 400 for client compatibility.
    EmailConflict,
    Internal,
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::Validation(errors) => ApiError::Validation(errors),
            PatientError::NotFound(_) => {
                tracing::warn!("Patient not found: {}", err);
                ApiError::NotFound(err.to_string())
            }
            PatientError::EmailConflict(_) => {
                tracing::warn!("Email already exists: {}", err);
                ApiError::EmailConflict
            }
            PatientError::InvalidInput(_) | PatientError::Store(_) => {
                tracing::error!("Patient service error: {:?}", err);
                ApiError::Internal
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageBody {
            message: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                let fields: BTreeMap<&str, &str> = errors
                    .errors()
                    .iter()
                    .map(|e| (e.field, e.message.as_str()))
                    .collect();
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            ApiError::BadRequest(msg) => message(StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => message(StatusCode::NOT_FOUND, msg),
            ApiError::EmailConflict => message(StatusCode::BAD_REQUEST, "Email already exists"),
            ApiError::Internal => message(StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        }
    }
}
