//! Naming conventions of the NOAA GOES ABI archive.
//!
//! Object keys look like:
//!
//! ```text
//! ABI-L2-CMIPF/2024/138/05/OR_ABI-L2-CMIPF-M6C02_G18_s20241380550210_e20241380559518_c20241380559584.nc
//! ```
//!
//! i.e. `{product}/{year}/{doy}/{hour}/` followed by a filename carrying the
//! scan mode and channel (`M6C02`), the platform (`G18`), and the scan
//! start/end/creation times.

use chrono::{DateTime, Utc};

use crate::error::{GoesError, GoesResult};
use crate::time::parse_goes_dtg;

/// Cloud and Moisture Imagery Product, Full Disk.
pub const DEFAULT_PRODUCT: &str = "ABI-L2-CMIPF";

/// Native file extension of archive entries.
pub const NETCDF_EXTENSION: &str = ".nc";

/// Imagery variable inside each CMI file.
pub const CMI_VARIABLE: &str = "CMI";

/// Number of hourly buckets searched, including the target hour.
pub const LOOKBACK_HOURS: u32 = 6;

/// Band 1: blue (0.47 um), 1 km.
pub const BLUE_BAND: u8 = 1;
/// Band 2: red (0.64 um), 0.5 km.
pub const RED_BAND: u8 = 2;
/// Band 3: "veggie" near-IR (0.86 um), 1 km. Only used for synthetic green.
pub const VEGGIE_BAND: u8 = 3;

/// Bands needed for a true-color composite.
pub const RGB_BANDS: [u8; 3] = [BLUE_BAND, RED_BAND, VEGGIE_BAND];

/// Marker identifying a band in mode-6 filenames, e.g. `M6C02`.
pub fn band_marker(band: u8) -> String {
    format!("M6C{:02}", band)
}

/// True if `key` is a native-format file for `band`.
pub fn is_band_file(key: &str, band: u8) -> bool {
    key.contains(&band_marker(band)) && key.ends_with(NETCDF_EXTENSION)
}

/// Filename part of an object key.
pub fn filename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Acquisition start time encoded in the `_s..._e` token of a key.
pub fn acquisition_start(key: &str) -> GoesResult<DateTime<Utc>> {
    let name = filename(key);
    let invalid = |message: &str| GoesError::InvalidKey {
        key: key.to_string(),
        message: message.to_string(),
    };

    let start = name.find("_s").ok_or_else(|| invalid("no start-time token"))? + 2;
    let rest = &name[start..];
    let end = rest.find("_e").ok_or_else(|| invalid("no end-time token"))?;

    parse_goes_dtg(&rest[..end]).ok_or_else(|| invalid("malformed start time"))
}
