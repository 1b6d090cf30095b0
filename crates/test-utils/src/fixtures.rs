//! GOES archive key fixtures.

use chrono::{DateTime, Timelike, Utc};

use goes_common::{HourBucket, DEFAULT_PRODUCT};

/// Platform code embedded in GOES-West keys.
const PLATFORM_G18: &str = "G18";

/// Acquisition start token `YYYYDDDHHMMSSt` for a timestamp.
pub fn start_token(start: DateTime<Utc>) -> String {
    format!(
        "{}{}",
        start.format("%Y%j%H%M%S"),
        start.nanosecond() / 100_000_000
    )
}

/// Full archive key for a full-disk band file starting at `start`.
///
/// The file lands in the hour bucket of `start` under the default product.
pub fn band_key(start: DateTime<Utc>, band: u8) -> String {
    let end = start + chrono::Duration::seconds(569);
    let created = start + chrono::Duration::seconds(577);
    format!(
        "{}OR_{}-M6C{:02}_{}_s{}_e{}_c{}.nc",
        HourBucket::from_datetime(start).prefix(DEFAULT_PRODUCT),
        DEFAULT_PRODUCT,
        band,
        PLATFORM_G18,
        start_token(start),
        start_token(end),
        start_token(created),
    )
}
