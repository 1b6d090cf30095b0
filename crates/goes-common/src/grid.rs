//! Spectral grids: reflectance values with a space sentinel.

use crate::error::{GoesError, GoesResult};

/// Sentinel for cells with no valid measurement (off-disk space, fill).
///
/// Distinct from a reflectance of zero. Always test with [`is_space`],
/// never with `==`.
pub const SPACE: f32 = f32::NAN;

/// True if the value is the space sentinel.
#[inline]
pub fn is_space(value: f32) -> bool {
    value.is_nan()
}

/// A 2D grid of reflectance values in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralGrid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl SpectralGrid {
    /// Wrap row-major data. Fails if the length does not match the
    /// dimensions or either dimension is zero.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> GoesResult<Self> {
        if width == 0 || height == 0 {
            return Err(GoesError::InvalidGrid(format!(
                "empty grid ({}x{})",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(GoesError::InvalidGrid(format!(
                "expected {} values for {}x{}, got {}",
                width * height,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// A square grid with every cell set to `value`.
    pub fn filled(side: usize, value: f32) -> Self {
        Self {
            width: side,
            height: side,
            data: vec![value; side * side],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Side length of the largest origin-anchored square that fits.
    pub fn side(&self) -> usize {
        self.width.min(self.height)
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.width + col] = value;
    }

    pub fn is_space_at(&self, row: usize, col: usize) -> bool {
        is_space(self.get(row, col))
    }

    pub fn space_count(&self) -> usize {
        self.data.iter().filter(|v| is_space(**v)).count()
    }

    /// Top-left `side x side` crop. Returns a clone when already that size.
    pub fn crop_square(&self, side: usize) -> GoesResult<SpectralGrid> {
        if side == 0 || side > self.width || side > self.height {
            return Err(GoesError::InvalidGrid(format!(
                "cannot crop {}x{} grid to {}x{}",
                self.width, self.height, side, side
            )));
        }
        if side == self.width && side == self.height {
            return Ok(self.clone());
        }
        let mut data = Vec::with_capacity(side * side);
        for row in 0..side {
            let start = row * self.width;
            data.extend_from_slice(&self.data[start..start + side]);
        }
        Ok(Self { width: side, height: side, data })
    }
}
