use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use furni_service::ServiceError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("request names no itemId")]
    MissingItemId,

    #[error("no file uploaded")]
    MissingUpload,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(e) => match e {
                ServiceError::NotFound { .. } | ServiceError::ItemNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::NoTargetCollection { .. }
                | ServiceError::InvalidAsset { .. }
                | ServiceError::InvalidName { .. } => StatusCode::BAD_REQUEST,
                ServiceError::Configuration { .. }
                | ServiceError::Serialization { .. }
                | ServiceError::Backend { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MissingItemId => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::InvalidBody(_) | Self::MissingUpload => {
                StatusCode::BAD_REQUEST
            }
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short summary sent as the `error` field of the response body.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Service(e) => match e {
                ServiceError::NotFound { .. } => "File not found",
                ServiceError::ItemNotFound { .. } => "Item not found",
                ServiceError::NoTargetCollection { .. } => "Could not add item",
                ServiceError::InvalidAsset { .. } => "Invalid file type or name",
                ServiceError::InvalidName { .. } => "Invalid name",
                ServiceError::Configuration { .. } => "Storage not configured",
                ServiceError::Serialization { .. } => "Server error",
                ServiceError::Backend { .. } => "Storage error",
            },
            Self::MissingItemId => "Item not found",
            Self::BadRequest(_) => "Bad request",
            Self::InvalidBody(_) => "Invalid request body",
            Self::MissingUpload => "No file uploaded",
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => "Server error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, status = status.as_u16(), "request failed");
        }
        let body = json!({
            "error": self.summary(),
            "details": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
