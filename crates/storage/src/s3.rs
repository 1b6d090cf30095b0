//! Anonymous S3 access to the NOAA open-data buckets.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use goes_common::{GoesError, GoesResult};

use crate::archive::{ArchiveObject, ArchiveStore};

/// Connection settings for the public archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3ArchiveConfig {
    /// AWS region of the NOAA buckets
    pub region: String,
    /// Optional endpoint override (S3-compatible mirrors, local MinIO)
    pub endpoint: Option<String>,
}

impl Default for S3ArchiveConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}

/// Archive backed by unsigned S3 requests.
pub struct S3Archive {
    client: aws_sdk_s3::Client,
}

impl S3Archive {
    /// Create a client that sends unsigned requests (public buckets only).
    pub async fn anonymous(config: &S3ArchiveConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .no_credentials()
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ArchiveStore for S3Archive {
    #[instrument(skip(self))]
    async fn list(&self, bucket: &str, prefix: &str) -> GoesResult<Vec<ArchiveObject>> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix);

            if let Some(ref token) = continuation_token {
                request = request.continuation_token(token.clone());
            }

            let response = request.send().await.map_err(|e| {
                GoesError::StorageError(format!(
                    "Failed to list s3://{}/{}: {}",
                    bucket,
                    prefix,
                    DisplayErrorContext(&e)
                ))
            })?;

            for object in response.contents() {
                if let Some(key) = object.key() {
                    objects.push(ArchiveObject {
                        key: key.to_string(),
                        last_modified: object
                            .last_modified()
                            .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
                            .unwrap_or(DateTime::<Utc>::MIN_UTC),
                        size: object.size().unwrap_or(0).max(0) as u64,
                    });
                }
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }

        debug!(count = objects.len(), "Listed objects");
        Ok(objects)
    }

    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> GoesResult<u64> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                GoesError::StorageError(format!(
                    "Failed to download s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let mut body = output.body;
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = body.try_next().await.map_err(|e| {
            GoesError::StorageError(format!("Failed to read s3://{}/{}: {}", bucket, key, e))
        })? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bytes = written, "Downloaded object");
        Ok(written)
    }
}
