//! Amazon S3 storage client
//!
//! Wraps aws-sdk-s3 behind the `StorageClient` trait. Credentials are
//! resolved by the SDK's default provider chain (environment, shared
//! profile, instance metadata); region, endpoint, and addressing style come
//! from gateway configuration. Every SDK failure is converted into a
//! `GatewayError` here so SDK vocabulary never crosses the trait boundary.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, instrument};

use crate::config::StorageConfig;
use crate::errors::{GatewayError, Result};
use crate::storage::{BucketSummary, ObjectSummary, StorageClient};

/// S3 client plus the region it creates buckets in
pub struct AwsStorageClient {
    client: Client,
    region: String,
}

impl AwsStorageClient {
    /// Build a client from the gateway configuration
    ///
    /// `endpoint` and `force_path_style` exist for S3-compatible services
    /// such as MinIO; both default to the real AWS endpoints.
    pub async fn new(config: &StorageConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            region: config.region.clone(),
        }
    }
}

#[async_trait]
impl StorageClient for AwsStorageClient {
    #[instrument(skip(self))]
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| map_sdk_error("ListBuckets", e))?;

        let buckets = output
            .buckets()
            .iter()
            .filter_map(|bucket| {
                bucket.name().map(|name| BucketSummary {
                    name: name.to_string(),
                    created: bucket.creation_date().and_then(to_chrono),
                })
            })
            .collect();
        Ok(buckets)
    }

    #[instrument(skip(self))]
    async fn list_bucket_content(&self, bucket: &str) -> Result<Vec<ObjectSummary>> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket);
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| map_sdk_error("ListObjectsV2", e))?;

            for object in response.contents() {
                let Some(key) = object.key() else { continue };
                objects.push(ObjectSummary {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                    last_modified: object.last_modified().and_then(to_chrono),
                    storage_class: object.storage_class().map(|c| c.as_str().to_string()),
                });
            }

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!(bucket, count = objects.len(), "listed bucket content");
        Ok(objects)
    }

    #[instrument(skip(self))]
    async fn create_bucket(&self, bucket: &str) -> Result<BucketSummary> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit LocationConstraint
        if self.region != "us-east-1" {
            let constraint = BucketLocationConstraint::from(self.region.as_str());
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| map_sdk_error("CreateBucket", e))?;

        // CreateBucket's response carries no timestamp; stamp it here
        Ok(BucketSummary {
            name: bucket.to_string(),
            created: Some(Utc::now()),
        })
    }

    #[instrument(skip(self))]
    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error("DeleteBucket", e))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn put_object(&self, bucket: &str, key: &str, source: &Path) -> Result<()> {
        let body = ByteStream::from_path(source).await.map_err(|e| {
            GatewayError::InvalidRequest(format!(
                "file `{}` could not be read: {e}",
                source.display()
            ))
        })?;

        let content_type = mime_guess::from_path(key).first_or_octet_stream();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type.essence_str())
            .body(body)
            .send()
            .await
            .map_err(|e| map_sdk_error("PutObject", e))?;
        Ok(())
    }
}

fn to_chrono(timestamp: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

/// Map an SDK failure onto the gateway error taxonomy
///
/// Classification is by S3 error code; failures without a code (dispatch,
/// timeout, response parsing) surface as upstream errors.
fn map_sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_owned);
    let message = match err.message() {
        Some(message) => message.to_owned(),
        None => DisplayErrorContext(err).to_string(),
    };
    classify(operation, code.as_deref(), message)
}

fn classify(operation: &'static str, code: Option<&str>, message: String) -> GatewayError {
    match code {
        Some("NoSuchBucket" | "NoSuchKey" | "NotFound") => GatewayError::BucketNotFound(message),
        Some(
            "BucketAlreadyExists" | "BucketAlreadyOwnedByYou" | "BucketNotEmpty"
            | "OperationAborted",
        ) => GatewayError::Conflict(message),
        Some(
            "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken"
            | "TokenRefreshRequired",
        ) => GatewayError::Unauthenticated(message),
        Some("AccessDenied" | "AccountProblem" | "AllAccessDisabled") => {
            GatewayError::Forbidden(message)
        }
        _ => GatewayError::Upstream(format!("{operation} failed: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_for(code: Option<&str>) -> StatusCode {
        classify("Test", code, "boom".to_string()).status()
    }

    #[test]
    fn missing_buckets_map_to_not_found() {
        assert_eq!(status_for(Some("NoSuchBucket")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(Some("NoSuchKey")), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflicts_map_to_conflict() {
        assert_eq!(status_for(Some("BucketAlreadyExists")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(Some("BucketAlreadyOwnedByYou")),
            StatusCode::CONFLICT
        );
        assert_eq!(status_for(Some("BucketNotEmpty")), StatusCode::CONFLICT);
    }

    #[test]
    fn credential_failures_split_into_authn_and_authz() {
        assert_eq!(
            status_for(Some("InvalidAccessKeyId")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(Some("SignatureDoesNotMatch")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_for(Some("AccessDenied")), StatusCode::FORBIDDEN);
    }

    #[test]
    fn everything_else_is_upstream() {
        assert_eq!(
            status_for(Some("SlowDown")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(None), StatusCode::INTERNAL_SERVER_ERROR);

        let err = classify("ListBuckets", None, "connection reset".to_string());
        assert!(err.to_string().contains("ListBuckets failed"));
    }

    #[test]
    fn chrono_conversion_preserves_the_instant() {
        let ts = aws_sdk_s3::primitives::DateTime::from_secs(1_714_561_200);
        let converted = to_chrono(&ts).unwrap();
        assert_eq!(converted.timestamp(), 1_714_561_200);
    }
}
