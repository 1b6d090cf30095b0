//! Discovery and retrieval of the bands behind a true-color image.
//!
//! - [`BandLocator`] finds the newest file per band with a bounded hourly
//!   lookback over the archive.
//! - [`BandRetriever`] downloads one file, decodes it and brings it to the
//!   target size.
//! - [`fetch_triad`] ties the two together for the red, veggie and blue
//!   bands.

pub mod locator;
pub mod retriever;
pub mod triad;

pub use locator::{latest_band_file, BandFile, BandLocator, SearchOptions};
pub use retriever::{mask_invalid, BandRetriever, DEFAULT_EARTH_SIZE, DEFAULT_FILL_VALUE};
pub use triad::{band_role, fetch_triad, BandTriad};
