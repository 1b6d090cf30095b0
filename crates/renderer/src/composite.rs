//! True-color compositing of the red, veggie and blue reflectance grids.
//!
//! ABI has no green band, so green is synthesized from the three visible and
//! near-infrared channels (CIMSS formula). Space cells in any input are
//! forced to black in the output.

use goes_common::{is_space, GoesError, GoesResult, RgbImage, SpectralGrid};
use tracing::debug;

/// Weights of (red, veggie, blue) in the synthetic green channel.
pub const GREEN_COEFFICIENTS: [f32; 3] = [0.45, 0.10, 0.45];

/// Display gamma applied to reflectance.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Canvas side as a multiple of the earth disk size.
pub const DEFAULT_PADDING: f64 = 2.1;

/// Map reflectance to 8-bit intensity with gamma correction.
///
/// Space cells become 0. Other cells are clipped to [0, 1], raised to
/// `1 / gamma`, scaled by 255 and truncated.
pub fn normalize(grid: &SpectralGrid, gamma: f32) -> Vec<u8> {
    let exponent = 1.0 / gamma;
    grid.data()
        .iter()
        .map(|&v| {
            if is_space(v) {
                0
            } else {
                (v.clamp(0.0, 1.0).powf(exponent) * 255.0) as u8
            }
        })
        .collect()
}

/// Cells that are space in any of the grids. All grids must share dimensions.
pub fn space_mask(grids: &[&SpectralGrid]) -> Vec<bool> {
    let len = grids.first().map(|g| g.data().len()).unwrap_or(0);
    (0..len)
        .map(|i| grids.iter().any(|g| is_space(g.data()[i])))
        .collect()
}

/// Synthetic green from normalized red, veggie and blue planes.
pub fn synthesize_green(red: &[u8], veggie: &[u8], blue: &[u8]) -> Vec<u8> {
    let [wr, wv, wb] = GREEN_COEFFICIENTS;
    red.iter()
        .zip(veggie)
        .zip(blue)
        .map(|((&r, &v), &b)| (wr * r as f32 + wv * v as f32 + wb * b as f32) as u8)
        .collect()
}

/// Set every masked pixel to black.
pub fn force_space(image: &mut RgbImage, mask: &[bool]) {
    let width = image.width();
    for (i, &space) in mask.iter().enumerate() {
        if space {
            image.set(i / width, i % width, [0, 0, 0]);
        }
    }
}

/// Combine three reflectance grids into a true-color image.
///
/// Grids are first cropped (from the top-left corner) to the smallest side
/// among them.
pub fn composite(
    red: &SpectralGrid,
    veggie: &SpectralGrid,
    blue: &SpectralGrid,
    gamma: f32,
) -> GoesResult<RgbImage> {
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(GoesError::InvalidConfig(format!("gamma must be positive, got {}", gamma)));
    }

    let side = red.side().min(veggie.side()).min(blue.side());
    let red = red.crop_square(side)?;
    let veggie = veggie.crop_square(side)?;
    let blue = blue.crop_square(side)?;

    let mask = space_mask(&[&red, &veggie, &blue]);

    let r = normalize(&red, gamma);
    let v = normalize(&veggie, gamma);
    let b = normalize(&blue, gamma);
    let g = synthesize_green(&r, &v, &b);

    let mut image = RgbImage::from_channels(side, side, &r, &g, &b);
    force_space(&mut image, &mask);

    debug!(
        side,
        space = mask.iter().filter(|&&m| m).count(),
        "Composited true color"
    );
    Ok(image)
}

/// Center `image` on a black square canvas `ratio` times its larger side.
///
/// Ratios of 1.0 or less return the image unchanged.
pub fn pad(image: &RgbImage, ratio: f64) -> RgbImage {
    if !(ratio > 1.0) {
        return image.clone();
    }

    let (height, width) = (image.height(), image.width());
    let side = (height.max(width) as f64 * ratio).floor() as usize;
    let mut canvas = RgbImage::black(side, side);
    canvas.blit(image, (side - height) / 2, (side - width) / 2);
    canvas
}

/// Composite, then pad when `padding > 1.0`.
pub fn render(
    red: &SpectralGrid,
    veggie: &SpectralGrid,
    blue: &SpectralGrid,
    padding: f64,
    gamma: f32,
) -> GoesResult<RgbImage> {
    let image = composite(red, veggie, blue, gamma)?;
    if padding > 1.0 {
        Ok(pad(&image, padding))
    } else {
        Ok(image)
    }
}
