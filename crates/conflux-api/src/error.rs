use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("inference request failed: {0}")]
    Inference(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidBody(e) => {
                tracing::error!("Failed to decode chat request: {}", e);
            }
            ApiError::Inference(e) => {
                tracing::error!("Inference call failed: {:#}", e);
            }
        }

        // Callers get one uniform error shape; details stay in the logs.
        let body = Json(json!({
            "error": "Failed to process request"
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
