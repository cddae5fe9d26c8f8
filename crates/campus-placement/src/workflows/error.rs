use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::storage::RepositoryError;

/// Closed set of failures surfaced by the placement and counselling workflows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    CapacityExceeded(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("internal failure: {0}")]
    Server(String),
}

impl PlacementError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            PlacementError::NotFound(_) => StatusCode::NOT_FOUND,
            PlacementError::Conflict(_)
            | PlacementError::Validation(_)
            | PlacementError::CapacityExceeded(_) => StatusCode::BAD_REQUEST,
            PlacementError::Unauthorized => StatusCode::UNAUTHORIZED,
            PlacementError::Forbidden(_) => StatusCode::FORBIDDEN,
            PlacementError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for PlacementError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound("Record not found".to_string()),
            RepositoryError::Conflict => Self::Conflict("Record already exists".to_string()),
            RepositoryError::CapacityReached => Self::CapacityExceeded("Capacity reached".to_string()),
            RepositoryError::Unavailable(reason) => Self::Server(reason),
        }
    }
}

impl From<JsonRejection> for PlacementError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for PlacementError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            PlacementError::Server(detail) => {
                tracing::error!(%detail, "unexpected workflow failure");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
