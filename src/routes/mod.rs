//! HTTP routing for the gateway API
//!
//! Binds the five facade endpoints under the versioned prefix:
//! - GET    /v1/aws/s3/list-buckets
//! - GET    /v1/aws/s3/bucket-content?bucket-name=...
//! - POST   /v1/aws/s3/bucket
//! - DELETE /v1/aws/s3/bucket/{bucket-name}
//! - PUT    /v1/aws/s3/bucket/{bucket-name}
//!
//! plus health probes, Prometheus metrics, and the OpenAPI description.

mod handlers;

use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

use crate::storage::StorageClient;

/// Query parameters for the bucket-content operation
#[derive(Debug, serde::Deserialize)]
pub struct BucketContentQuery {
    #[serde(rename = "bucket-name")]
    pub bucket_name: Option<String>,
}

/// Create the gateway router
pub fn create_router(storage: Arc<dyn StorageClient>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/metrics", get(handlers::metrics))
        .route("/api-docs/openapi.json", get(handlers::api_docs))
        .route("/v1/aws/s3/list-buckets", get(handlers::list_buckets))
        .route("/v1/aws/s3/bucket-content", get(handlers::bucket_content))
        .route("/v1/aws/s3/bucket", post(handlers::create_bucket))
        .route(
            "/v1/aws/s3/bucket/:bucket_name",
            delete(handlers::delete_bucket).put(handlers::put_object),
        )
        .with_state(storage)
}
