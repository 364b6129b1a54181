use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use prep_mastery::MasteryError;
use serde_json::json;
use thiserror::Error;

use crate::ai::AiError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("AI generation failed: {0}")]
    Ai(#[from] AiError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Ai(AiError::Disabled) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Ai(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<MasteryError> for ApiError {
    fn from(e: MasteryError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the logs
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Internal server error".to_string()
            }
            Self::Ai(e) => {
                tracing::warn!(error = %e, "AI generation failed");
                self.to_string()
            }
            Self::NotFound(_) | Self::Validation(_) => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
