use image::Rgba;

use super::*;

#[test]
fn disabled_is_identity() {
    let img = RgbaImage::from_fn(4, 4, |x, y| Rgba([(x * 20) as u8, (y * 30) as u8, 77, 200]));
    assert_eq!(auto_color_correct(&img, false), img);
}

#[test]
fn autocontrast_stretches_each_channel_to_full_range() {
    let mut img = RgbaImage::from_raw(
        2,
        1,
        vec![100, 50, 10, 255, 150, 60, 10, 255],
    )
    .unwrap();
    autocontrast_rgb(&mut img);
    assert_eq!(img.get_pixel(0, 0).0[0], 0);
    assert_eq!(img.get_pixel(1, 0).0[0], 255);
    assert_eq!(img.get_pixel(0, 0).0[1], 0);
    assert_eq!(img.get_pixel(1, 0).0[1], 255);
    // Flat channel is left alone.
    assert_eq!(img.get_pixel(0, 0).0[2], 10);
    assert_eq!(img.get_pixel(1, 0).0[2], 10);
}

#[test]
fn correction_preserves_alpha_channel() {
    let img = RgbaImage::from_fn(8, 8, |x, y| {
        Rgba([(x * 30) as u8, (y * 25) as u8, 128, (x * y * 4) as u8])
    });
    let out = auto_color_correct(&img, true);
    for (a, b) in img.pixels().zip(out.pixels()) {
        assert_eq!(a.0[3], b.0[3]);
    }
}

#[test]
fn grey_pixels_are_stable_under_saturation() {
    let mut img = RgbaImage::from_pixel(2, 2, Rgba([90, 90, 90, 255]));
    enhance_color(&mut img, 1.05);
    assert_eq!(img.get_pixel(0, 0).0, [90, 90, 90, 255]);
}

#[test]
fn contrast_pushes_values_away_from_mean() {
    let mut img = RgbaImage::from_raw(2, 1, vec![50, 50, 50, 255, 200, 200, 200, 255]).unwrap();
    enhance_contrast(&mut img, 1.5);
    assert!(img.get_pixel(0, 0).0[0] < 50);
    assert!(img.get_pixel(1, 0).0[0] > 200);
}

#[test]
fn luma_weights_sum_to_white() {
    assert_eq!(luma(255, 255, 255), 255);
    assert_eq!(luma(0, 0, 0), 0);
}
