use async_graphql::ErrorExtensions;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Failures that abort a request.
///
/// Input problems are not here: they travel back as `FieldError` data so a
/// single response can carry several of them. A missing entity is not here
/// either, it is a `null` result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid bearer token")]
    Unauthorized,
    #[error("not authenticated")]
    Unauthenticated,
    #[error("not allowed to modify this post")]
    Forbidden,
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("too many requests")]
    RateLimited,
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::InvalidCursor(_) => "INVALID_CURSOR",
            ApiError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            ApiError::RateLimited => "RATE_LIMITED",
            ApiError::InternalError(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
            ApiError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client. Storage and internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::StorageUnavailable(detail) => {
                error!("Storage unavailable: {}", detail);
                "Storage unavailable".to_string()
            }
            ApiError::InternalError(detail) => {
                error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(detail) => ApiError::StorageUnavailable(detail),
            StoreError::UniqueViolation(field) => {
                ApiError::InternalError(format!("unhandled unique violation on {}", field))
            }
        }
    }
}

/// Plain HTTP failures (before a GraphQL request is executed).
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(serde_json::json!({
              "error": self.public_message(),
              "code": self.code(),
            })),
        )
            .into_response()
    }
}

/// GraphQL failures carry the same code as an `extensions.code` entry.
impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.public_message())
            .extend_with(|_, extensions| extensions.set("code", code))
    }
}
