use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding service error: {0}")]
    EmbeddingProvider(String),

    #[error("No songs indexed")]
    EmptyCorpus,

    #[error("Unexpected {context} dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Load error: {0}")]
    Load(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::EmbeddingProvider(ref msg) => {
                tracing::error!("Embedding service error: {}", msg);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::EmptyCorpus => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::DimensionMismatch { .. } => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Load(ref msg) => {
                tracing::error!("Load error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Load error".to_string())
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
