//! Error responses for the HTTP service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use idscan_core::error::IdScanError;
use idscan_core::models::record::OcrStatus;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upload failed: {0}")]
    UploadFailed(IdScanError),

    #[error("Internal error: {0}")]
    Internal(IdScanError),
}

impl From<IdScanError> for ApiError {
    fn from(err: IdScanError) -> Self {
        match err {
            IdScanError::NotFound(id) => ApiError::NotFound(id),
            IdScanError::InvalidInput(msg) => ApiError::InvalidRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": "Image not found." }),
            ),
            ApiError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": msg }),
            ),
            ApiError::UploadFailed(e) => {
                tracing::error!("Error processing image: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "message": "Internal Server Error",
                        "status": OcrStatus::Failure.to_string(),
                    }),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
