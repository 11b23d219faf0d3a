//! Error types for the gateway
//!
//! Every failure, whether produced by request validation or reported by the
//! storage service, is translated into a single `ApiError` JSON body carrying
//! the HTTP status, reason phrase, message, and original request path.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Request violated a documented constraint
    #[error("{0}")]
    InvalidRequest(String),

    /// Bucket does not exist on the storage service
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// Bucket name already taken, or bucket not empty on delete
    #[error("{0}")]
    Conflict(String),

    /// The storage service rejected the configured credentials
    #[error("storage service authentication failed: {0}")]
    Unauthenticated(String),

    /// The credentials are valid but not allowed to perform the operation
    #[error("storage service denied access: {0}")]
    Forbidden(String),

    /// Any other storage-service failure
    #[error("storage service error: {0}")]
    Upstream(String),
}

impl GatewayError {
    /// HTTP status this failure maps to
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::BucketNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatewayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Uniform error body, the only error shape the gateway emits
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ApiError {
    /// Translate a gateway failure for the request at `path`
    pub fn from_error(err: GatewayError, path: &str) -> Self {
        let status = err.status();
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: err.to_string(),
            path: path.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            GatewayError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::BucketNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::Conflict("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            GatewayError::Unauthenticated("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GatewayError::Upstream("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn api_error_carries_status_reason_and_path() {
        let err = GatewayError::BucketNotFound("no bucket named alpha".into());
        let body = ApiError::from_error(err, "/v1/aws/s3/bucket/alpha");

        assert_eq!(body.status, 404);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.path, "/v1/aws/s3/bucket/alpha");
        assert!(body.message.contains("alpha"));
    }

    #[test]
    fn api_error_serializes_every_field() {
        let err = GatewayError::InvalidRequest("bucket name too short".into());
        let body = ApiError::from_error(err, "/v1/aws/s3/bucket");
        let json = serde_json::to_value(&body).unwrap();

        assert!(json.get("timestamp").is_some());
        assert_eq!(json["status"], 400);
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["message"], "bucket name too short");
        assert_eq!(json["path"], "/v1/aws/s3/bucket");
    }
}
