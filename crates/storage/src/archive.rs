//! Archive access abstraction.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use goes_common::GoesResult;

/// One entry of an archive listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveObject {
    /// Full object key
    pub key: String,
    /// Last modification time reported by the archive
    pub last_modified: DateTime<Utc>,
    /// Size in bytes
    pub size: u64,
}

/// Read-only object listing and download.
///
/// Implementations surface every transport failure as
/// [`goes_common::GoesError::StorageError`]; callers decide whether a
/// failure is fatal.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// List every object under `prefix` in `bucket`.
    async fn list(&self, bucket: &str, prefix: &str) -> GoesResult<Vec<ArchiveObject>>;

    /// Download one object to `dest`, returning the number of bytes written.
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> GoesResult<u64>;
}
