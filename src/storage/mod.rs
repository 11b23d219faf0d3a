//! Storage client abstraction
//!
//! The outbound port in front of the managed S3 SDK. Handlers only ever see
//! this trait and the plain records below; SDK types stay inside `aws.rs`.

mod aws;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::errors::Result;

pub use aws::AwsStorageClient;

/// Bucket record normalized from the SDK response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    pub name: String,
    pub created: Option<DateTime<Utc>>,
}

/// Object record normalized from the SDK response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub storage_class: Option<String>,
}

/// Outbound port with the five storage operations
///
/// Implementations are shared across requests behind an `Arc` and must be
/// safe to call concurrently.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Enumerate all buckets visible to the configured credentials, in the
    /// service's response order
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>>;

    /// Every object key in the bucket, with pagination flattened so the
    /// caller sees a single list in the service's key order
    async fn list_bucket_content(&self, bucket: &str) -> Result<Vec<ObjectSummary>>;

    /// Create a bucket in the configured region
    async fn create_bucket(&self, bucket: &str) -> Result<BucketSummary>;

    /// Remove a bucket; the bucket must be empty
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload the file at `source` under `key` in `bucket`
    async fn put_object(&self, bucket: &str, key: &str, source: &Path) -> Result<()>;
}

/// Create the storage client from configuration
pub async fn create_client(config: &StorageConfig) -> Result<Arc<dyn StorageClient>> {
    let client = AwsStorageClient::new(config).await;
    Ok(Arc::new(client))
}
