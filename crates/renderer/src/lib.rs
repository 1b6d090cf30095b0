//! Rendering of GOES true-color imagery.
//!
//! - [`composite`]: gamma normalization, synthetic green, space masking and
//!   padding
//! - [`png`]: lossless RGB PNG encoding of the result

pub mod composite;
pub mod png;

pub use composite::{
    composite, force_space, normalize, pad, render, space_mask, synthesize_green, DEFAULT_GAMMA,
    DEFAULT_PADDING, GREEN_COEFFICIENTS,
};
pub use png::encode_png;
