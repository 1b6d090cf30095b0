//! Decoded variables and the decoder abstraction.

use std::path::Path;

use crate::error::{NetCdfError, NetCdfResult};

/// A 2D variable decoded from a NetCDF file.
///
/// `data` holds unpacked values (scale and offset applied). Cells the file
/// declares invalid keep the unpacked fill value in `data`; `mask` marks
/// them when the decoder could identify them.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedVariable {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
    /// Declared fill value, in unpacked units
    pub fill_value: Option<f32>,
    /// Embedded invalid-data mask (`true` = invalid), row-major
    pub mask: Option<Vec<bool>>,
}

impl DecodedVariable {
    /// Check that data and mask lengths agree with the dimensions.
    pub fn validate(&self) -> NetCdfResult<()> {
        let expected = self.width * self.height;
        if expected == 0 {
            return Err(NetCdfError::InvalidFormat(format!(
                "empty variable ({}x{})",
                self.width, self.height
            )));
        }
        if self.data.len() != expected {
            return Err(NetCdfError::InvalidFormat(format!(
                "expected {} values for {}x{}, got {}",
                expected,
                self.width,
                self.height,
                self.data.len()
            )));
        }
        if let Some(mask) = &self.mask {
            if mask.len() != expected {
                return Err(NetCdfError::InvalidFormat(format!(
                    "mask has {} entries, expected {}",
                    mask.len(),
                    expected
                )));
            }
        }
        Ok(())
    }
}

/// Opens a file and decodes one named 2D variable.
pub trait VariableDecoder: Send + Sync {
    fn decode(&self, path: &Path, variable: &str) -> NetCdfResult<DecodedVariable>;
}

/// CF packing attributes of an integer variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    /// Raw (packed) fill value
    pub fill_value: Option<f64>,
    /// `_Unsigned = "true"`: raw 16-bit values are unsigned
    pub unsigned: bool,
    /// Raw valid range, inclusive
    pub valid_range: Option<(f64, f64)>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            unsigned: false,
            valid_range: None,
        }
    }
}

impl Packing {
    fn to_unsigned(&self, raw: f64) -> f64 {
        if self.unsigned && raw < 0.0 {
            raw + 65536.0
        } else {
            raw
        }
    }

    /// Unpack one raw value. Returns the unpacked value and whether the
    /// raw value is fill or outside the valid range.
    pub fn unpack(&self, raw: f64) -> (f32, bool) {
        let raw = self.to_unsigned(raw);
        let is_fill = self
            .fill_value
            .map(|fill| raw == self.to_unsigned(fill))
            .unwrap_or(false);
        let out_of_range = self
            .valid_range
            .map(|(lo, hi)| raw < self.to_unsigned(lo) || raw > self.to_unsigned(hi))
            .unwrap_or(false);
        let value = (raw * self.scale_factor + self.add_offset) as f32;
        (value, is_fill || out_of_range)
    }

    /// Fill value in unpacked units.
    pub fn unpacked_fill(&self) -> Option<f32> {
        self.fill_value
            .map(|fill| (self.to_unsigned(fill) * self.scale_factor + self.add_offset) as f32)
    }
}
