//! Compositor properties over synthetic reflectance grids.

use goes_common::{RgbImage, SpectralGrid, SPACE};
use renderer::{composite, force_space, normalize, pad, render, space_mask};
use test_utils::{block_grid, constant_grid, disk_grid, ramp_grid, space_grid};

/// `round(255 * 0.5^(1/2.2))`
const HALF_REFLECTANCE_GAMMA_22: u8 = 186;

#[test]
fn test_block_scenario() {
    let red = block_grid(10, 3, 3, 4, 0.5);
    let veggie = block_grid(10, 3, 3, 4, 0.5);
    let blue = block_grid(10, 3, 3, 4, 0.5);

    let image = composite(&red, &veggie, &blue, 2.2).unwrap();

    assert_eq!((image.width(), image.height()), (10, 10));
    for row in 0..10 {
        for col in 0..10 {
            let [r, g, b] = image.get(row, col);
            let inside = (3..7).contains(&row) && (3..7).contains(&col);
            if inside {
                assert_eq!(r, HALF_REFLECTANCE_GAMMA_22);
                assert_eq!(b, HALF_REFLECTANCE_GAMMA_22);
                assert!(g.abs_diff(HALF_REFLECTANCE_GAMMA_22) <= 1, "green was {}", g);
            } else {
                assert_eq!([r, g, b], [0, 0, 0], "({}, {}) should be black", row, col);
            }
        }
    }
}

#[test]
fn test_normalize_range_for_many_gammas() {
    let mut grid = ramp_grid(16);
    grid.set(0, 0, SPACE);
    grid.set(5, 5, -3.0);
    grid.set(6, 6, 7.0);

    for gamma in [0.1f32, 0.5, 1.0, 2.2, 4.0, 10.0] {
        let out = normalize(&grid, gamma);
        assert_eq!(out[0], 0, "space must map to 0 at gamma {}", gamma);
        assert_eq!(out[5 * 16 + 5], 0);
        assert_eq!(out[6 * 16 + 6], 255);
    }
}

#[test]
fn test_normalize_is_monotonic() {
    let values: Vec<f32> = (0..=200).map(|i| i as f32 / 200.0 - 0.25).collect();
    let side = 1;
    for gamma in [0.5f32, 1.0, 2.2] {
        let mut previous = 0u8;
        for &v in &values {
            let out = normalize(&SpectralGrid::new(side, side, vec![v]).unwrap(), gamma)[0];
            assert!(out >= previous, "normalize decreased at {} (gamma {})", v, gamma);
            previous = out;
        }
    }
}

#[test]
fn test_gamma_brightens_midtones() {
    let grid = constant_grid(1, 0.25);
    assert!(normalize(&grid, 2.2)[0] > normalize(&grid, 1.0)[0]);
}

#[test]
fn test_space_in_any_band_is_black() {
    let red = constant_grid(4, 0.9);
    let mut veggie = constant_grid(4, 0.9);
    veggie.set(1, 2, SPACE);
    let blue = constant_grid(4, 0.9);

    let image = composite(&red, &veggie, &blue, 2.2).unwrap();

    assert_eq!(image.get(1, 2), [0, 0, 0]);
    assert_ne!(image.get(1, 1), [0, 0, 0]);
}

#[test]
fn test_force_space_is_idempotent() {
    let red = disk_grid(12, 0.7);
    let veggie = constant_grid(12, 0.3);
    let blue = constant_grid(12, 0.4);
    let mask = space_mask(&[&red, &veggie, &blue]);

    let mut once = RgbImage::black(12, 12);
    for row in 0..12 {
        for col in 0..12 {
            once.set(row, col, [200, 150, 100]);
        }
    }
    force_space(&mut once, &mask);
    let mut twice = once.clone();
    force_space(&mut twice, &mask);

    assert_eq!(once, twice);
    assert_eq!(once.get(0, 0), [0, 0, 0]);
    assert_eq!(once.get(6, 6), [200, 150, 100]);
}

#[test]
fn test_crop_is_anchored_top_left() {
    let mut red = constant_grid(6, 0.5);
    // Only the bottom-right corner of the larger grid is space
    red.set(5, 5, SPACE);
    let veggie = constant_grid(5, 0.5);
    let blue = constant_grid(5, 0.5);

    let image = composite(&red, &veggie, &blue, 2.2).unwrap();

    assert_eq!(image.width(), 5);
    // The space cell lies outside the 5x5 origin crop
    assert!(image.pixels().iter().all(|&c| c > 0));
}

#[test]
fn test_all_space_renders_black() {
    let grid = space_grid(8);
    let image = composite(&grid, &grid, &grid, 2.2).unwrap();
    assert!(image.pixels().iter().all(|&c| c == 0));
}

#[test]
fn test_pad_identity() {
    let grid = disk_grid(9, 0.6);
    let image = composite(&grid, &grid, &grid, 2.2).unwrap();
    assert_eq!(pad(&image, 1.0), image);
}

#[test]
fn test_pad_recovers_original() {
    let grid = disk_grid(20, 0.6);
    let image = composite(&grid, &grid, &grid, 2.2).unwrap();

    for ratio in [1.01f64, 1.5, 2.1, 3.0] {
        let padded = pad(&image, ratio);
        let side = (20.0 * ratio).floor() as usize;
        assert_eq!((padded.width(), padded.height()), (side, side));

        let offset = (side - 20) / 2;
        assert_eq!(padded.crop(offset, offset, 20, 20), image);
        assert_eq!(padded.get(0, 0), [0, 0, 0]);
    }
}

#[test]
fn test_render_pads_only_above_one() {
    let grid = disk_grid(10, 0.5);
    let unpadded = render(&grid, &grid, &grid, 1.0, 2.2).unwrap();
    let padded = render(&grid, &grid, &grid, 2.1, 2.2).unwrap();

    assert_eq!(unpadded.width(), 10);
    assert_eq!(padded.width(), 21);
}
