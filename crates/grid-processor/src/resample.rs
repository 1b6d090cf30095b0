//! Mask-aware Lanczos resampling of spectral grids.
//!
//! The filter is separable: a horizontal pass followed by a vertical pass,
//! each using a precomputed weight table per output index. Sample centers
//! and support follow the usual convention for high-quality image resizing:
//! output index `i` maps to input coordinate `(i + 0.5) * scale`, and the
//! kernel is stretched by `scale` when shrinking.
//!
//! Space cells never contribute. Both passes carry a numerator plane (sum of
//! weighted valid values) and a denominator plane (sum of weights of valid
//! samples). An output cell is valid when at least half of its kernel weight
//! fell on valid input, and its value is `numerator / denominator`.

use goes_common::{is_space, GoesError, GoesResult, SpectralGrid, SPACE};
use tracing::{debug, instrument};

/// Lanczos window radius, in input samples (at scale 1).
pub const LANCZOS_RADIUS: f64 = 3.0;

/// Minimum share of kernel weight that must come from valid input.
pub const MIN_VALID_WEIGHT: f64 = 0.5;

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = std::f64::consts::PI * x;
        px.sin() / px
    }
}

/// Lanczos-3 kernel.
pub fn lanczos(x: f64) -> f64 {
    if x.abs() < LANCZOS_RADIUS {
        sinc(x) * sinc(x / LANCZOS_RADIUS)
    } else {
        0.0
    }
}

/// Normalized filter taps for one output index.
#[derive(Debug, Clone)]
struct Taps {
    start: usize,
    weights: Vec<f64>,
}

/// Weight table mapping `input` samples onto `output` samples along one axis.
#[derive(Debug, Clone)]
struct AxisWeights {
    taps: Vec<Taps>,
}

impl AxisWeights {
    fn new(input: usize, output: usize) -> Self {
        let scale = input as f64 / output as f64;
        let filter_scale = scale.max(1.0);
        let support = LANCZOS_RADIUS * filter_scale;

        let taps = (0..output)
            .map(|i| {
                let center = (i as f64 + 0.5) * scale;
                let lo = ((center - support + 0.5).floor().max(0.0)) as usize;
                let hi = ((center + support + 0.5).floor() as usize).min(input);

                let mut weights: Vec<f64> = (lo..hi)
                    .map(|j| lanczos((j as f64 - center + 0.5) / filter_scale))
                    .collect();

                let total: f64 = weights.iter().sum();
                if total != 0.0 {
                    for w in &mut weights {
                        *w /= total;
                    }
                }

                Taps { start: lo, weights }
            })
            .collect();

        Self { taps }
    }
}

/// Resample a grid to `side x side`.
///
/// Grids that are already `side x side` are returned unchanged.
pub fn resample_square(grid: &SpectralGrid, side: usize) -> GoesResult<SpectralGrid> {
    resample(grid, side, side)
}

/// Resample a grid to `width x height` with the mask-aware Lanczos filter.
#[instrument(skip(grid), fields(src_width = grid.width(), src_height = grid.height()))]
pub fn resample(grid: &SpectralGrid, width: usize, height: usize) -> GoesResult<SpectralGrid> {
    if width == 0 || height == 0 {
        return Err(GoesError::InvalidGrid(format!(
            "cannot resample to {}x{}",
            width, height
        )));
    }
    if grid.width() == width && grid.height() == height {
        return Ok(grid.clone());
    }

    let src_width = grid.width();
    let src_height = grid.height();
    let src = grid.data();

    // Horizontal pass: src_height rows of `width` columns
    let x_weights = AxisWeights::new(src_width, width);
    let mut num = vec![0.0f32; src_height * width];
    let mut den = vec![0.0f32; src_height * width];

    for row in 0..src_height {
        let line = &src[row * src_width..(row + 1) * src_width];
        for (col, taps) in x_weights.taps.iter().enumerate() {
            let mut n = 0.0f64;
            let mut d = 0.0f64;
            for (k, &w) in taps.weights.iter().enumerate() {
                let v = line[taps.start + k];
                if !is_space(v) {
                    n += w * v as f64;
                    d += w;
                }
            }
            num[row * width + col] = n as f32;
            den[row * width + col] = d as f32;
        }
    }

    // Vertical pass
    let y_weights = AxisWeights::new(src_height, height);
    let mut out = vec![SPACE; width * height];

    for (row, taps) in y_weights.taps.iter().enumerate() {
        for col in 0..width {
            let mut n = 0.0f64;
            let mut d = 0.0f64;
            for (k, &w) in taps.weights.iter().enumerate() {
                let idx = (taps.start + k) * width + col;
                n += w * num[idx] as f64;
                d += w * den[idx] as f64;
            }
            if d >= MIN_VALID_WEIGHT {
                out[row * width + col] = (n / d) as f32;
            }
        }
    }

    let resampled = SpectralGrid::new(width, height, out)?;
    debug!(
        width,
        height,
        space = resampled.space_count(),
        "Resampled grid"
    );
    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn constant(width: usize, height: usize, value: f32) -> SpectralGrid {
        SpectralGrid::new(width, height, vec![value; width * height]).unwrap()
    }

    #[test]
    fn test_lanczos_kernel() {
        assert_eq!(lanczos(0.0), 1.0);
        assert_approx_eq!(lanczos(1.0), 0.0, 1e-12);
        assert_approx_eq!(lanczos(2.0), 0.0, 1e-12);
        assert_eq!(lanczos(3.0), 0.0);
        assert_eq!(lanczos(-4.5), 0.0);
        assert!(lanczos(0.5) > 0.0);
        assert!(lanczos(1.5) < 0.0);
    }

    #[test]
    fn test_axis_weights_are_normalized() {
        for (input, output) in [(20, 10), (10, 20), (7, 3), (5424, 2048)] {
            let weights = AxisWeights::new(input, output);
            assert_eq!(weights.taps.len(), output);
            for taps in &weights.taps {
                let total: f64 = taps.weights.iter().sum();
                assert_approx_eq!(total, 1.0, 1e-9);
                assert!(taps.start + taps.weights.len() <= input);
            }
        }
    }

    #[test]
    fn test_same_size_is_identity() {
        let grid = SpectralGrid::new(2, 2, vec![0.1, SPACE, 0.3, 0.4]).unwrap();
        let out = resample_square(&grid, 2).unwrap();
        assert_eq!(out.width(), 2);
        assert!(out.is_space_at(0, 1));
        assert_eq!(out.get(1, 1), 0.4);
    }

    #[test]
    fn test_downsample_constant_field() {
        let out = resample_square(&constant(20, 20, 0.5), 10).unwrap();
        assert_eq!((out.width(), out.height()), (10, 10));
        for &v in out.data() {
            assert_approx_eq!(v, 0.5, 1e-5);
        }
    }

    #[test]
    fn test_upsample_constant_field() {
        let out = resample_square(&constant(4, 4, 0.3), 8).unwrap();
        assert_eq!(out.space_count(), 0);
        for &v in out.data() {
            assert_approx_eq!(v, 0.3, 1e-5);
        }
    }

    #[test]
    fn test_non_square_input_becomes_square() {
        let out = resample_square(&constant(12, 8, 0.7), 6).unwrap();
        assert!(out.is_square());
        assert_eq!(out.side(), 6);
    }

    #[test]
    fn test_all_space_stays_space() {
        let out = resample_square(&constant(16, 16, SPACE), 8).unwrap();
        assert_eq!(out.space_count(), 64);
    }

    #[test]
    fn test_space_does_not_leak_into_values() {
        // Left half space, right half 0.5
        let mut data = vec![0.5f32; 20 * 20];
        for row in 0..20 {
            for col in 0..10 {
                data[row * 20 + col] = SPACE;
            }
        }
        let grid = SpectralGrid::new(20, 20, data).unwrap();
        let out = resample_square(&grid, 10).unwrap();

        for row in 0..10 {
            for col in 0..=3 {
                assert!(out.is_space_at(row, col), "({}, {}) should be space", row, col);
            }
            for col in 6..10 {
                assert!(!out.is_space_at(row, col));
            }
            for col in 0..10 {
                let v = out.get(row, col);
                if !is_space(v) {
                    assert_approx_eq!(v, 0.5, 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_zero_target_rejected() {
        assert!(resample_square(&constant(4, 4, 0.1), 0).is_err());
    }
}
