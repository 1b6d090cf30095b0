//! Storage abstractions for the GOES imagery pipeline.
//!
//! Provides a read-only archive interface ([`ArchiveStore`]) used by the
//! band locator (listing) and the band retriever (download), plus the
//! anonymous S3 implementation for the NOAA open-data buckets.

pub mod archive;
pub mod s3;

pub use archive::{ArchiveObject, ArchiveStore};
pub use s3::{S3Archive, S3ArchiveConfig};
