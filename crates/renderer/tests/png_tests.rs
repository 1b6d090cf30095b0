//! PNG output decodes back to the exact composite.

use renderer::{composite, encode_png, pad};
use test_utils::{block_grid, disk_grid, ramp_grid};

fn decode(png: &[u8]) -> image::RgbImage {
    image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .expect("PNG should decode")
        .to_rgb8()
}

#[test]
fn test_round_trip_recovers_channels() {
    let red = ramp_grid(32);
    let veggie = disk_grid(32, 0.4);
    let blue = block_grid(32, 4, 4, 20, 0.9);
    let image = composite(&red, &veggie, &blue, 2.2).unwrap();

    let decoded = decode(&encode_png(&image).unwrap());

    assert_eq!(decoded.dimensions(), (32, 32));
    assert_eq!(decoded.as_raw().as_slice(), image.pixels());
}

#[test]
fn test_round_trip_non_square_canvas() {
    let grid = disk_grid(16, 0.7);
    let image = composite(&grid, &grid, &grid, 1.8).unwrap();
    let wide = image.crop(0, 0, 16, 5);

    let decoded = decode(&encode_png(&wide).unwrap());

    assert_eq!(decoded.dimensions(), (16, 5));
    assert_eq!(decoded.as_raw().as_slice(), wide.pixels());
}

#[test]
fn test_padded_output_round_trip() {
    let grid = disk_grid(24, 0.5);
    let padded = pad(&composite(&grid, &grid, &grid, 2.2).unwrap(), 2.1);

    let decoded = decode(&encode_png(&padded).unwrap());

    assert_eq!(decoded.dimensions(), (50, 50));
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(decoded.as_raw().as_slice(), padded.pixels());
}
