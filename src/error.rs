use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::error;
use validator::ValidationErrors;

use crate::sessions::SessionError;
use crate::store::StoreError;

/// Field name → messages, rendered as the body of a 400.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const FIELD_REQUIRED: &str = "This field is required.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("authentication required")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("password hashing failed: {0}")]
    Password(#[from] bcrypt::BcryptError),
}

impl AppError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(BTreeMap::from([(field.to_string(), vec![message.into()])]))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(field_errors(&errors))
    }
}

/// Flattens validator output into [`FieldErrors`], falling back to the error code.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Takes a required input, noting it in `errors` when absent.
pub fn required<T>(value: Option<T>, field: &str, errors: &mut FieldErrors) -> Option<T> {
    if value.is_none() {
        errors
            .entry(field.to_string())
            .or_default()
            .push(FIELD_REQUIRED.to_string());
    }
    value
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, r#"Basic realm="api""#)],
                Json(json!({ "detail": "Authentication credentials were not provided." })),
            )
                .into_response(),
            AppError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
            }
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::Store(StoreError::SeatAlreadyBooked(_)) => {
                AppError::field("seat", crate::services::booking::SEAT_ALREADY_BOOKED)
                    .into_response()
            }
            AppError::Store(StoreError::Conflict { field, message }) => {
                AppError::field(field, message).into_response()
            }
            other => {
                error!("request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}
