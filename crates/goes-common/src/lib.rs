//! Common types and utilities shared across the GOES imagery crates.

pub mod archive;
pub mod error;
pub mod grid;
pub mod image;
pub mod satellite;
pub mod time;

pub use archive::{
    acquisition_start, band_marker, is_band_file, BLUE_BAND, CMI_VARIABLE, DEFAULT_PRODUCT,
    LOOKBACK_HOURS, NETCDF_EXTENSION, RED_BAND, RGB_BANDS, VEGGIE_BAND,
};
pub use error::{GoesError, GoesResult};
pub use grid::{is_space, SpectralGrid, SPACE};
pub use image::RgbImage;
pub use satellite::{Satellite, SatelliteEntry, SatelliteRegistry, DEFAULT_SATELLITE};
pub use time::{hourly_buckets, parse_goes_dtg, HourBucket};
