use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::encoder::EncodeError;
use crate::store::StoreError;

/// Handler-level failures, rendered as `{"message": ...}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    /// A referenced record in the request body or path does not exist.
    #[error("{0}")]
    InvalidReference(&'static str),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl ApiError {
    pub const INVALID_STATE: &'static str = "Invalid state abbreviation";
    pub const INVALID_LOCATION: &'static str = "Invalid location id";
    pub const INVALID_CONFERENCE: &'static str = "Invalid conference id";

    /// Map a failed lookup of a referenced record to a 400 with `message`.
    pub fn reference(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |err| match err {
            StoreError::NotFound { .. } => ApiError::InvalidReference(message),
            other => ApiError::Store(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Store(err) => {
                tracing::error!("Store failure: {:?}", err);
                "Internal server error".to_string()
            }
            ApiError::Encode(err) => {
                tracing::error!("Failed to encode response: {:?}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
