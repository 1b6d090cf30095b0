//! 8-bit RGB raster produced by the compositor.

/// Interleaved RGB image, row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RgbImage {
    /// All-black image.
    pub fn black(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 3],
        }
    }

    /// Interleave three equally sized channel planes.
    ///
    /// Panics if the planes differ in length from `width * height`.
    pub fn from_channels(width: usize, height: usize, red: &[u8], green: &[u8], blue: &[u8]) -> Self {
        let n = width * height;
        assert!(
            red.len() == n && green.len() == n && blue.len() == n,
            "channel planes must hold {} values",
            n
        );
        let mut pixels = Vec::with_capacity(n * 3);
        for i in 0..n {
            pixels.extend_from_slice(&[red[i], green[i], blue[i]]);
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> [u8; 3] {
        let i = (row * self.width + col) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, rgb: [u8; 3]) {
        let i = (row * self.width + col) * 3;
        self.pixels[i..i + 3].copy_from_slice(&rgb);
    }

    /// Copy `other` into this image with its top-left corner at (row, col).
    ///
    /// Panics if `other` does not fit.
    pub fn blit(&mut self, other: &RgbImage, row: usize, col: usize) {
        assert!(
            row + other.height <= self.height && col + other.width <= self.width,
            "blit of {}x{} at ({}, {}) exceeds {}x{}",
            other.width,
            other.height,
            row,
            col,
            self.width,
            self.height
        );
        let src_stride = other.width * 3;
        for r in 0..other.height {
            let dst = ((row + r) * self.width + col) * 3;
            let src = r * src_stride;
            self.pixels[dst..dst + src_stride].copy_from_slice(&other.pixels[src..src + src_stride]);
        }
    }

    /// Extract a `width x height` window with its top-left corner at (row, col).
    pub fn crop(&self, row: usize, col: usize, width: usize, height: usize) -> RgbImage {
        let mut out = RgbImage::black(width, height);
        for r in 0..height {
            let src = ((row + r) * self.width + col) * 3;
            let dst = r * width * 3;
            out.pixels[dst..dst + width * 3].copy_from_slice(&self.pixels[src..src + width * 3]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_channels_interleaves() {
        let img = RgbImage::from_channels(2, 1, &[1, 2], &[3, 4], &[5, 6]);
        assert_eq!(img.pixels(), &[1, 3, 5, 2, 4, 6]);
        assert_eq!(img.get(0, 1), [2, 4, 6]);
    }

    #[test]
    fn test_blit_and_crop() {
        let mut canvas = RgbImage::black(4, 4);
        let mut tile = RgbImage::black(2, 2);
        tile.set(0, 0, [9, 8, 7]);
        tile.set(1, 1, [1, 2, 3]);
        canvas.blit(&tile, 1, 2);
        assert_eq!(canvas.get(1, 2), [9, 8, 7]);
        assert_eq!(canvas.get(2, 3), [1, 2, 3]);
        assert_eq!(canvas.crop(1, 2, 2, 2), tile);
    }
}
