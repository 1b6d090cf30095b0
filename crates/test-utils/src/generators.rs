//! Synthetic reflectance grids.
//!
//! Values are predictable so tests can assert exact outputs after
//! normalization and compositing.

use goes_common::{SpectralGrid, SPACE};

/// Grid where every cell is space.
pub fn space_grid(side: usize) -> SpectralGrid {
    SpectralGrid::filled(side, SPACE)
}

/// Grid with constant reflectance everywhere.
pub fn constant_grid(side: usize, value: f32) -> SpectralGrid {
    SpectralGrid::filled(side, value)
}

/// Space grid with a `block x block` square of `value` whose top-left
/// corner is at (`top`, `left`).
pub fn block_grid(side: usize, top: usize, left: usize, block: usize, value: f32) -> SpectralGrid {
    let mut grid = space_grid(side);
    for row in top..(top + block).min(side) {
        for col in left..(left + block).min(side) {
            grid.set(row, col, value);
        }
    }
    grid
}

/// Full-disk style grid: `value` inside a centered circle of radius
/// `side / 2`, space outside.
pub fn disk_grid(side: usize, value: f32) -> SpectralGrid {
    let mut grid = space_grid(side);
    let center = side as f64 / 2.0;
    let radius = side as f64 / 2.0;
    for row in 0..side {
        for col in 0..side {
            let dy = row as f64 + 0.5 - center;
            let dx = col as f64 + 0.5 - center;
            if dx * dx + dy * dy <= radius * radius {
                grid.set(row, col, value);
            }
        }
    }
    grid
}

/// Horizontal reflectance ramp from 0 (left) to 1 (right).
pub fn ramp_grid(side: usize) -> SpectralGrid {
    let mut grid = constant_grid(side, 0.0);
    let denom = side.saturating_sub(1).max(1) as f32;
    for row in 0..side {
        for col in 0..side {
            grid.set(row, col, col as f32 / denom);
        }
    }
    grid
}
