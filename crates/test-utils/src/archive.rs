//! In-memory [`ArchiveStore`] with failure injection and call recording.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use goes_common::{GoesError, GoesResult};
use storage::{ArchiveObject, ArchiveStore};

#[derive(Debug, Clone)]
struct StoredObject {
    bucket: String,
    object: ArchiveObject,
    content: Vec<u8>,
}

/// Archive whose contents live in memory.
///
/// Listings return objects in insertion order. Prefixes registered with
/// [`MemoryArchive::fail_listing`] and keys registered with
/// [`MemoryArchive::fail_download`] produce storage errors.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    objects: Mutex<Vec<StoredObject>>,
    failing_prefixes: Mutex<Vec<String>>,
    failing_keys: Mutex<Vec<String>>,
    list_calls: Mutex<Vec<String>>,
    download_calls: Mutex<Vec<String>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, returning `self` for chaining.
    pub fn with_object(
        self,
        bucket: &str,
        key: &str,
        last_modified: DateTime<Utc>,
        content: &[u8],
    ) -> Self {
        self.insert(bucket, key, last_modified, content);
        self
    }

    pub fn insert(&self, bucket: &str, key: &str, last_modified: DateTime<Utc>, content: &[u8]) {
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            object: ArchiveObject {
                key: key.to_string(),
                last_modified,
                size: content.len() as u64,
            },
            content: content.to_vec(),
        });
    }

    /// Make listings of exactly `prefix` fail.
    pub fn fail_listing(&self, prefix: &str) {
        self.failing_prefixes.lock().unwrap().push(prefix.to_string());
    }

    /// Make downloads of `key` fail.
    pub fn fail_download(&self, key: &str) {
        self.failing_keys.lock().unwrap().push(key.to_string());
    }

    /// Prefixes passed to `list`, in call order.
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Keys passed to `download`, in call order.
    pub fn download_calls(&self) -> Vec<String> {
        self.download_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveStore for MemoryArchive {
    async fn list(&self, bucket: &str, prefix: &str) -> GoesResult<Vec<ArchiveObject>> {
        self.list_calls.lock().unwrap().push(prefix.to_string());

        if self.failing_prefixes.lock().unwrap().iter().any(|p| p == prefix) {
            return Err(GoesError::StorageError(format!(
                "injected listing failure for s3://{}/{}",
                bucket, prefix
            )));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.bucket == bucket && s.object.key.starts_with(prefix))
            .map(|s| s.object.clone())
            .collect())
    }

    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> GoesResult<u64> {
        self.download_calls.lock().unwrap().push(key.to_string());

        if self.failing_keys.lock().unwrap().iter().any(|k| k == key) {
            return Err(GoesError::StorageError(format!(
                "injected download failure for s3://{}/{}",
                bucket, key
            )));
        }

        let content = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.bucket == bucket && s.object.key == key)
            .map(|s| s.content.clone())
            .ok_or_else(|| {
                GoesError::StorageError(format!("NoSuchKey: s3://{}/{}", bucket, key))
            })?;

        std::fs::write(dest, &content)?;
        Ok(content.len() as u64)
    }
}
