use image::{GrayImage, Luma, RgbaImage};
use kurbo::{RoundedRect, Shape as _};

use crate::effects::composite::mul_div255;

/// The image's own alpha channel as a mask.
pub fn alpha_mask(img: &RgbaImage) -> GrayImage {
    let (w, h) = img.dimensions();
    GrayImage::from_fn(w, h, |x, y| Luma([img.get_pixel(x, y).0[3]]))
}

/// Hard-edged rounded rectangle covering the whole `width` x `height` area.
///
/// A pixel is opaque when its centre lies inside the shape. The radius is
/// clamped to half the shorter side.
pub fn rounded_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let (w, h) = (f64::from(width), f64::from(height));
    let r = f64::from(radius).min(w.min(h) / 2.0);
    let shape = RoundedRect::new(0.0, 0.0, w, h, r);
    GrayImage::from_fn(width, height, |x, y| {
        let center = kurbo::Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        Luma([if shape.contains(center) { 255 } else { 0 }])
    })
}

/// Per-pixel product of two equally sized masks (`a * b / 255`).
///
/// The result is never more opaque than either input.
pub fn multiply(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let (w, h) = a.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let av = a.get_pixel(x, y).0[0];
        let bv = b.get_pixel_checked(x, y).map_or(0, |p| p.0[0]);
        Luma([mul_div255(u16::from(av), u16::from(bv))])
    })
}

/// 3x3 minimum filter (erosion); edges replicate the border pixels.
pub fn min_filter_3x3(mask: &GrayImage) -> GrayImage {
    let (w, h) = mask.dimensions();
    if w == 0 || h == 0 {
        return mask.clone();
    }
    let (wi, hi) = (w as i64, h as i64);
    GrayImage::from_fn(w, h, |x, y| {
        let mut min = u8::MAX;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let sx = (i64::from(x) + dx).clamp(0, wi - 1) as u32;
                let sy = (i64::from(y) + dy).clamp(0, hi - 1) as u32;
                min = min.min(mask.get_pixel(sx, sy).0[0]);
            }
        }
        Luma([min])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
