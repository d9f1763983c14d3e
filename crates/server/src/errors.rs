use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::multipart::MultipartError;
use mcqgen::McqError;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// Every variant becomes a plain-text response with a matching status code.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the MCQ pipeline.
    Mcq(McqError),
    /// A malformed multipart request body.
    Multipart(MultipartError),
    /// Invalid input that never reached the pipeline.
    BadRequest(String),
    NotFound(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<McqError> for AppError {
    fn from(err: McqError) -> Self {
        AppError::Mcq(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Multipart(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// The HTTP status for a pipeline error.
pub fn mcq_error_status(err: &McqError) -> StatusCode {
    match err {
        McqError::InvalidFileType(_)
        | McqError::EmptyDocument
        | McqError::InvalidQuestionCount(_) => StatusCode::BAD_REQUEST,
        McqError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        McqError::Extraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        McqError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        McqError::Generation(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            AppError::Mcq(err) => {
                let status = mcq_error_status(&err);
                if status.is_server_error() {
                    error!("McqError: {:?}", err);
                } else {
                    warn!("Rejected request: {err}");
                }
                let message = match err {
                    McqError::Storage(_) => "Failed to store the uploaded file.".to_string(),
                    other => other.to_string(),
                };
                (status, message)
            }
            AppError::Multipart(err) => {
                warn!("Malformed multipart request: {err}");
                (err.status(), err.body_text())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        (status_code, message).into_response()
    }
}
