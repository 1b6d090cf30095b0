//! Grid processing for the GOES imagery pipeline.
//!
//! Bands arrive at different native resolutions (0.5 km for the red band,
//! 1 km for blue and veggie). [`resample_square`] brings each one onto the
//! common square output grid without letting space cells bleed into valid
//! data.

pub mod resample;

pub use resample::{lanczos, resample, resample_square, LANCZOS_RADIUS, MIN_VALID_WEIGHT};
