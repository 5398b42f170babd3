use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::ErrorResponse;
use crate::story::ValidationError;

pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate story. Please try again.";
pub const MALFORMED_BODY_MESSAGE: &str = "Request body must be valid JSON.";

/// Everything a story request can fail with, as the caller sees it.
///
/// Generation failures carry no detail on purpose: the cause is logged where
/// it happens and the body stays generic.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    MalformedBody,
    GenerationFailed,
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::MalformedBody => (StatusCode::BAD_REQUEST, MALFORMED_BODY_MESSAGE.into()),
            ApiError::GenerationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATION_FAILED_MESSAGE.into(),
            ),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
