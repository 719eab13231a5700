//! Error types for ccos-cg HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::pipeline::PipelineError;
use crate::services::wordpress_publisher::PublishError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing API key or publishing credentials (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generative service failed or returned unusable output (502)
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Publishing platform rejected the post; `status` is the upstream code,
    /// None for transport failures (502)
    #[error("Publishing failed: {message}")]
    Publish { status: Option<u16>, message: String },

    /// Store failure (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl From<ccos_common::Error> for ApiError {
    fn from(err: ccos_common::Error) -> Self {
        use ccos_common::Error as E;
        match err {
            E::InvalidInput(msg) => ApiError::BadRequest(msg),
            E::NotFound(msg) => ApiError::NotFound(msg),
            E::Config(msg) => ApiError::Config(msg),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            err @ PipelineError::Generation { .. } => ApiError::Generation(err.to_string()),
            PipelineError::Store(inner) => inner.into(),
        }
    }
}

impl From<PublishError> for ApiError {
    fn from(err: PublishError) -> Self {
        match err {
            err @ PublishError::MissingCredentials(_) => ApiError::Config(err.to_string()),
            PublishError::Network(message) => ApiError::Publish { status: None, message },
            PublishError::Rejected { status, message } => ApiError::Publish {
                status: Some(status),
                message,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", msg),
            ApiError::Generation(msg) => (StatusCode::BAD_GATEWAY, "GENERATION_ERROR", msg),
            ApiError::Publish { status, message } => {
                // Upstream codes outside the error range would read as success
                let status = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, "PUBLISH_ERROR", message)
            }
            ApiError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", msg),
        };

        tracing::error!(status = status.as_u16(), code = error_code, "{}", message);

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::genai_client::GenAiError;
    use crate::services::stages::Stage;

    #[test]
    fn test_generation_error_names_stage() {
        let err: ApiError = PipelineError::Generation {
            stage: Stage::PainPointAnalysis,
            source: GenAiError::Malformed("expected value".to_string()),
        }
        .into();

        match err {
            ApiError::Generation(msg) => assert!(msg.contains("stage 1")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_publish_status_is_forwarded() {
        let response = ApiError::from(PublishError::Rejected {
            status: 403,
            message: "Sorry, you are not allowed".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = ApiError::from(PublishError::Network("timed out".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let response = ApiError::from(PublishError::MissingCredentials("url")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_common_error_mapping() {
        let response =
            ApiError::from(ccos_common::Error::InvalidInput("keyword must not be empty".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(ccos_common::Error::Internal("bad column".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
