//! Temporal band locator.
//!
//! The NOAA archive publishes full-disk files in irregular hourly batches, so
//! the newest file for a band is often not yet under the target hour. The
//! locator walks hourly prefixes backward from the target time and takes the
//! most recently modified file from the first hour that has one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use goes_common::{
    hourly_buckets, is_band_file, GoesError, GoesResult, SatelliteRegistry, DEFAULT_PRODUCT,
    LOOKBACK_HOURS,
};
use storage::{ArchiveObject, ArchiveStore};

/// Product and lookback depth of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Archive product directory (e.g. `ABI-L2-CMIPF`)
    pub product: String,
    /// Number of hourly buckets to try, starting with the target hour
    pub lookback_hours: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            product: DEFAULT_PRODUCT.to_string(),
            lookback_hours: LOOKBACK_HOURS,
        }
    }
}

/// Archive reference for one band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandFile {
    pub bucket: String,
    pub key: String,
    pub band: u8,
    pub last_modified: DateTime<Utc>,
}

/// Outcome of scanning one hourly bucket for one band.
#[derive(Debug)]
enum BucketScan {
    /// Latest matching file in the bucket
    Matched(ArchiveObject),
    /// Listing succeeded but nothing matched (including an empty listing)
    NoMatch { listed: usize },
    /// Listing call failed; treated like an empty bucket
    ListingFailed(GoesError),
}

/// Finds the newest file per band within a bounded hourly lookback.
pub struct BandLocator<'a> {
    registry: &'a SatelliteRegistry,
    store: &'a dyn ArchiveStore,
    options: SearchOptions,
}

impl<'a> BandLocator<'a> {
    pub fn new(registry: &'a SatelliteRegistry, store: &'a dyn ArchiveStore) -> Self {
        Self {
            registry,
            store,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Locate each of `bands` for `satellite` at or before `target`.
    ///
    /// Bands with no file in the lookback window are absent from the result.
    /// Only an unknown satellite key is an error.
    #[instrument(skip(self, bands), fields(bands = ?bands))]
    pub async fn locate(
        &self,
        target: DateTime<Utc>,
        satellite: &str,
        bands: &[u8],
    ) -> GoesResult<BTreeMap<u8, BandFile>> {
        let bucket = &self.registry.get(satellite)?.bucket;
        let mut found = BTreeMap::new();

        for &band in bands {
            if let Some(file) = self.locate_band(bucket, target, band).await {
                info!(band, key = %file.key, "Located band file");
                found.insert(band, file);
            }
        }

        Ok(found)
    }

    async fn locate_band(&self, bucket: &str, target: DateTime<Utc>, band: u8) -> Option<BandFile> {
        for hour in hourly_buckets(target, self.options.lookback_hours) {
            let prefix = hour.prefix(&self.options.product);

            match self.scan_bucket(bucket, &prefix, band).await {
                BucketScan::Matched(object) => {
                    return Some(BandFile {
                        bucket: bucket.to_string(),
                        key: object.key,
                        band,
                        last_modified: object.last_modified,
                    });
                }
                BucketScan::NoMatch { listed } => {
                    debug!(
                        band,
                        prefix = %prefix,
                        listed,
                        "No matching file, trying previous hour"
                    );
                }
                BucketScan::ListingFailed(error) => {
                    debug!(
                        band,
                        prefix = %prefix,
                        error = %error,
                        "Listing failed, trying previous hour"
                    );
                }
            }
        }

        debug!(
            band,
            lookback = self.options.lookback_hours,
            "Band not found in lookback window"
        );
        None
    }

    async fn scan_bucket(&self, bucket: &str, prefix: &str, band: u8) -> BucketScan {
        match self.store.list(bucket, prefix).await {
            Ok(objects) => match latest_band_file(&objects, band) {
                Some(object) => BucketScan::Matched(object.clone()),
                None => BucketScan::NoMatch {
                    listed: objects.len(),
                },
            },
            Err(error) => BucketScan::ListingFailed(error),
        }
    }
}

/// The most recently modified `.nc` file for `band` in a listing.
///
/// On equal modification times the entry listed first wins.
pub fn latest_band_file(objects: &[ArchiveObject], band: u8) -> Option<&ArchiveObject> {
    objects
        .iter()
        .filter(|o| is_band_file(&o.key, band))
        .fold(None, |best: Option<&ArchiveObject>, candidate| match best {
            Some(b) if b.last_modified >= candidate.last_modified => Some(b),
            _ => Some(candidate),
        })
}
