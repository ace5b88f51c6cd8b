use axum::{
    Json,
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use postcraft_types::api::MessageResponse;
use postcraft_types::models::ValidationError;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("User already exists with this email")]
    DuplicateEmail,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied. No token provided.")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No image uploaded")]
    NoFileProvided,

    #[error("Upload failed: {0}")]
    Multipart(#[from] MultipartError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Body that is not JSON, or JSON of the wrong shape.
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("Template not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Over-limit bodies keep their 413
            Self::Upload(UploadError::Multipart(err)) => err.status(),
            Self::Validation(_) | Self::Upload(_) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::MissingToken) => StatusCode::UNAUTHORIZED,
            Self::Auth(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Internal(err) => {
                error!(error = %err, "Error occurred in handler");
                "Something went wrong".to_string()
            }
            err => err.to_string(),
        };
        (status, Json(MessageResponse::new(message))).into_response()
    }
}
