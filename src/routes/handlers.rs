//! Request handlers for the gateway endpoints
//!
//! Each handler decodes the request, runs validation, calls the storage
//! client, and serializes the result. Failures are translated into the
//! uniform `ApiError` body carrying the original request path; extractor
//! rejections are caught here so no failure path answers with a
//! framework-shaped body.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::api::{self, BucketDescriptor, BucketObjectDescriptor, UploadRequest};
use crate::errors::{ApiError, GatewayError};
use crate::routes::BucketContentQuery;
use crate::storage::StorageClient;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe endpoint
pub async fn ready() -> impl IntoResponse {
    (StatusCode::OK, "Ready")
}

/// Prometheus metrics endpoint
pub async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&crate::metrics::REGISTRY.gather(), &mut buffer) {
        error!(error = %e, "metrics encoding failed");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// OpenAPI description of the gateway surface
pub async fn api_docs() -> impl IntoResponse {
    Json(api::docs::openapi_document())
}

/// Translate a gateway failure into the uniform error body
fn fail(err: GatewayError, uri: &Uri) -> ApiError {
    error!(error = %err, path = %uri.path(), "request failed");
    ApiError::from_error(err, uri.path())
}

/// GET /v1/aws/s3/list-buckets
#[instrument(skip(storage))]
pub async fn list_buckets(
    State(storage): State<Arc<dyn StorageClient>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<BucketDescriptor>>, ApiError> {
    let buckets = storage.list_buckets().await.map_err(|e| fail(e, &uri))?;

    info!(count = buckets.len(), "listed buckets");
    Ok(Json(
        buckets.into_iter().map(BucketDescriptor::from).collect(),
    ))
}

/// GET /v1/aws/s3/bucket-content?bucket-name={name}
#[instrument(skip(storage))]
pub async fn bucket_content(
    State(storage): State<Arc<dyn StorageClient>>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<BucketContentQuery>, QueryRejection>,
) -> Result<Json<Vec<BucketObjectDescriptor>>, ApiError> {
    let Query(query) =
        query.map_err(|e| fail(GatewayError::InvalidRequest(e.body_text()), &uri))?;
    let bucket = query.bucket_name.unwrap_or_default();
    api::require_bucket_name(&bucket).map_err(|e| fail(e, &uri))?;

    let objects = storage
        .list_bucket_content(&bucket)
        .await
        .map_err(|e| fail(e, &uri))?;

    info!(bucket = %bucket, count = objects.len(), "listed bucket content");
    Ok(Json(
        objects
            .into_iter()
            .map(BucketObjectDescriptor::from)
            .collect(),
    ))
}

/// POST /v1/aws/s3/bucket
#[instrument(skip(storage, payload))]
pub async fn create_bucket(
    State(storage): State<Arc<dyn StorageClient>>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<BucketDescriptor>, JsonRejection>,
) -> Result<(StatusCode, Json<BucketDescriptor>), ApiError> {
    let Json(descriptor) =
        payload.map_err(|e| fail(GatewayError::InvalidRequest(e.body_text()), &uri))?;

    api::validate_bucket_name(&descriptor.name).map_err(|e| fail(e, &uri))?;

    let created = storage
        .create_bucket(&descriptor.name)
        .await
        .map_err(|e| fail(e, &uri))?;

    info!(bucket = %created.name, "created bucket");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// DELETE /v1/aws/s3/bucket/{bucket-name}
#[instrument(skip(storage))]
pub async fn delete_bucket(
    State(storage): State<Arc<dyn StorageClient>>,
    OriginalUri(uri): OriginalUri,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(bucket_name) =
        path.map_err(|e| fail(GatewayError::InvalidRequest(e.body_text()), &uri))?;
    api::require_bucket_name(&bucket_name).map_err(|e| fail(e, &uri))?;

    storage
        .delete_bucket(&bucket_name)
        .await
        .map_err(|e| fail(e, &uri))?;

    info!(bucket = %bucket_name, "deleted bucket");
    Ok(StatusCode::OK)
}

/// PUT /v1/aws/s3/bucket/{bucket-name}
#[instrument(skip(storage, payload))]
pub async fn put_object(
    State(storage): State<Arc<dyn StorageClient>>,
    OriginalUri(uri): OriginalUri,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(bucket_name) =
        path.map_err(|e| fail(GatewayError::InvalidRequest(e.body_text()), &uri))?;
    let Json(upload) =
        payload.map_err(|e| fail(GatewayError::InvalidRequest(e.body_text()), &uri))?;

    api::require_bucket_name(&bucket_name).map_err(|e| fail(e, &uri))?;
    api::validate_upload(&upload).await.map_err(|e| fail(e, &uri))?;

    storage
        .put_object(
            &bucket_name,
            &upload.file_name,
            std::path::Path::new(&upload.file),
        )
        .await
        .map_err(|e| fail(e, &uri))?;

    info!(bucket = %bucket_name, key = %upload.file_name, "uploaded object");
    Ok(StatusCode::OK)
}
