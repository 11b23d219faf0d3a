//! Wire-facing record types, request validation, and mapping
//!
//! The JSON shapes documented on the HTTP surface live here, together with
//! the validation rules that run before any storage call and the projection
//! from the adapter's plain records onto the wire shapes.

pub mod docs;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{GatewayError, Result};
use crate::storage::{BucketSummary, ObjectSummary};

/// Bucket as exposed on the HTTP surface
///
/// Returned by list-buckets and create-bucket; accepted as the create-bucket
/// request body, where only `name` is meaningful on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

/// Object entry as exposed on the HTTP surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketObjectDescriptor {
    pub key: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

/// Body of PUT /v1/aws/s3/bucket/{bucket-name}
///
/// `file` is a path on the gateway host's filesystem, resolved relative to
/// the server's working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: String,
    pub file: String,
}

impl From<BucketSummary> for BucketDescriptor {
    fn from(summary: BucketSummary) -> Self {
        Self {
            name: summary.name,
            creation_date: summary.created,
        }
    }
}

impl From<ObjectSummary> for BucketObjectDescriptor {
    fn from(summary: ObjectSummary) -> Self {
        Self {
            key: summary.key,
            size: summary.size,
            last_modified: summary.last_modified,
            storage_class: summary.storage_class,
        }
    }
}

const BUCKET_NAME_MIN: usize = 3;
const BUCKET_NAME_MAX: usize = 63;

/// Check a bucket name for creation against the S3 naming rules
///
/// Names must be 3-63 characters, lowercase ASCII letters, digits and
/// hyphens only, and must start and end with a letter or digit. Global
/// uniqueness is enforced by the storage service itself.
pub fn validate_bucket_name(name: &str) -> Result<()> {
    if name.len() < BUCKET_NAME_MIN || name.len() > BUCKET_NAME_MAX {
        return Err(GatewayError::InvalidRequest(format!(
            "bucket name `{name}` must be between {BUCKET_NAME_MIN} and {BUCKET_NAME_MAX} characters"
        )));
    }
    if name.chars().any(|c| c.is_whitespace()) {
        return Err(GatewayError::InvalidRequest(format!(
            "bucket name `{name}` must not contain whitespace"
        )));
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(GatewayError::InvalidRequest(format!(
            "bucket name `{name}` must be lowercase"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(GatewayError::InvalidRequest(format!(
            "bucket name `{name}` may only contain lowercase letters, digits and hyphens"
        )));
    }
    let first = name.chars().next().unwrap_or('-');
    let last = name.chars().last().unwrap_or('-');
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(GatewayError::InvalidRequest(format!(
            "bucket name `{name}` must start and end with a letter or digit"
        )));
    }
    Ok(())
}

/// Check a path or query `bucket-name` parameter is usable
pub fn require_bucket_name(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "bucket-name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate an upload request against the gateway host's filesystem
///
/// The source path must name an existing regular file at the moment the
/// request is handled; anything else is a client error.
pub async fn validate_upload(request: &UploadRequest) -> Result<()> {
    if request.file_name.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "fileName must not be empty".to_string(),
        ));
    }
    if request.file.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "file must not be empty".to_string(),
        ));
    }
    match tokio::fs::metadata(&request.file).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(GatewayError::InvalidRequest(format!(
            "file `{}` is not a regular file",
            request.file
        ))),
        Err(_) => Err(GatewayError::InvalidRequest(format!(
            "file `{}` does not exist or is not readable",
            request.file
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_well_formed_bucket_names() {
        for name in ["abc", "my-good-bucket", "bucket123", "0-0-0", "a1-b2-c3"] {
            assert!(validate_bucket_name(name).is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn rejects_length_violations() {
        let err = validate_bucket_name("ab").unwrap_err();
        assert!(err.to_string().contains("between 3 and 63"));

        let long = "a".repeat(64);
        assert!(validate_bucket_name(&long).is_err());
    }

    #[test]
    fn rejects_uppercase_and_whitespace() {
        let err = validate_bucket_name("MyBucket").unwrap_err();
        assert!(err.to_string().contains("lowercase"));

        let err = validate_bucket_name("my bucket").unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn rejects_non_dns_shapes() {
        assert!(validate_bucket_name("bucket_name").is_err());
        assert!(validate_bucket_name("-leading").is_err());
        assert!(validate_bucket_name("trailing-").is_err());
        assert!(validate_bucket_name("dotted.name").is_err());
    }

    #[test]
    fn require_bucket_name_rejects_blank() {
        assert!(require_bucket_name("").is_err());
        assert!(require_bucket_name("   ").is_err());
        assert!(require_bucket_name("alpha").is_ok());
    }

    #[tokio::test]
    async fn validate_upload_rejects_empty_fields_and_missing_files() {
        let missing = UploadRequest {
            file_name: "report.pdf".into(),
            file: "/no/such/file/anywhere".into(),
        };
        let err = validate_upload(&missing).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let blank_name = UploadRequest {
            file_name: "".into(),
            file: "/tmp/x".into(),
        };
        let err = validate_upload(&blank_name).await.unwrap_err();
        assert!(err.to_string().contains("fileName"));

        let blank_file = UploadRequest {
            file_name: "report.pdf".into(),
            file: "  ".into(),
        };
        assert!(validate_upload(&blank_file).await.is_err());
    }

    #[tokio::test]
    async fn validate_upload_accepts_existing_regular_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let request = UploadRequest {
            file_name: "report.pdf".into(),
            file: file.path().to_string_lossy().into_owned(),
        };
        assert!(validate_upload(&request).await.is_ok());
    }

    #[test]
    fn descriptor_omits_absent_creation_date() {
        let descriptor = BucketDescriptor {
            name: "alpha".into(),
            creation_date: None,
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert!(json.get("creationDate").is_none());
    }

    #[test]
    fn descriptor_uses_camel_case_on_the_wire() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let descriptor = BucketObjectDescriptor {
            key: "a.txt".into(),
            size: 10,
            last_modified: Some(when),
            storage_class: Some("STANDARD".into()),
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["key"], "a.txt");
        assert_eq!(json["size"], 10);
        assert!(json.get("lastModified").is_some());
        assert_eq!(json["storageClass"], "STANDARD");
    }

    #[test]
    fn upload_request_ignores_unknown_fields_but_requires_known_ones() {
        let parsed: UploadRequest = serde_json::from_str(
            r#"{"fileName":"report.pdf","file":"/tmp/report.pdf","extra":true}"#,
        )
        .unwrap();
        assert_eq!(parsed.file_name, "report.pdf");

        let missing: std::result::Result<UploadRequest, _> =
            serde_json::from_str(r#"{"fileName":"report.pdf"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn bucket_summary_maps_onto_descriptor() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let descriptor: BucketDescriptor = BucketSummary {
            name: "alpha".into(),
            created: Some(when),
        }
        .into();
        assert_eq!(descriptor.name, "alpha");
        assert_eq!(descriptor.creation_date, Some(when));
    }
}
