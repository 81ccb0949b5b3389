use crate::config::ConfigError;
use crate::screening::{EncodingError, ModelUnavailable, SessionError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("screening error: {0}")]
    Screening(#[from] SessionError),
}

impl From<ModelUnavailable> for AppError {
    fn from(value: ModelUnavailable) -> Self {
        Self::Screening(SessionError::ModelUnavailable(value))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Json(_) | AppError::Encoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Screening(SessionError::Profile(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Screening(SessionError::ModelUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Screening(SessionError::Prediction(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            AppError::Screening(SessionError::ModelUnavailable(err)) => err.user_message(),
            AppError::Screening(err) => err.to_string(),
            other => other.to_string(),
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
