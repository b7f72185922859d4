//! Error envelope for the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tackboardapp::error::{BoardError, LaunchError};
use thiserror::Error;
use tracing::error;

/// Anything a route can fail with. Rendered as
/// `{"success": false, "msg": "..."}` with a status derived from the kind.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ApiError::Board(BoardError::InvalidInput(msg.into()))
    }

    /// - NotFound, missing open handler: 404
    /// - PermissionDenied: 403
    /// - InvalidInput: 400
    /// - everything else: 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Board(err) => match err {
                BoardError::NotFound(_) => StatusCode::NOT_FOUND,
                BoardError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                BoardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                BoardError::Launch(LaunchError::HandlerMissing(_)) => StatusCode::NOT_FOUND,
                BoardError::Launch(LaunchError::PermissionDenied(_)) => StatusCode::FORBIDDEN,
                BoardError::Launch(_) | BoardError::Io(_) | BoardError::Serialization(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = json!({ "success": false, "msg": self.to_string() });
        (status, Json(body)).into_response()
    }
}
