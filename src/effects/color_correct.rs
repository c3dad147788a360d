//! Automatic colour correction for photos.
//!
//! Only the RGB channels are touched; alpha passes through unchanged so cutouts
//! keep their shape.

use image::RgbaImage;

/// Saturation factor applied after the contrast stretch.
pub const SATURATION_BOOST: f32 = 1.05;
/// Contrast factor applied last.
pub const CONTRAST_BOOST: f32 = 1.02;

/// Stretch contrast, then nudge saturation and contrast. Returns a copy when
/// `enabled` is false.
pub fn auto_color_correct(img: &RgbaImage, enabled: bool) -> RgbaImage {
    let mut out = img.clone();
    if !enabled {
        return out;
    }
    autocontrast_rgb(&mut out);
    enhance_color(&mut out, SATURATION_BOOST);
    enhance_contrast(&mut out, CONTRAST_BOOST);
    out
}

/// Per-channel histogram stretch of R, G and B to the full 0..=255 range.
pub fn autocontrast_rgb(img: &mut RgbaImage) {
    let mut lo = [u8::MAX; 3];
    let mut hi = [u8::MIN; 3];
    for px in img.pixels() {
        for c in 0..3 {
            lo[c] = lo[c].min(px.0[c]);
            hi[c] = hi[c].max(px.0[c]);
        }
    }

    let luts: [[u8; 256]; 3] = std::array::from_fn(|c| stretch_lut(lo[c], hi[c]));
    for px in img.pixels_mut() {
        for c in 0..3 {
            px.0[c] = luts[c][usize::from(px.0[c])];
        }
    }
}

fn stretch_lut(lo: u8, hi: u8) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if hi <= lo {
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        return lut;
    }
    let span = u32::from(hi - lo);
    for (i, v) in lut.iter_mut().enumerate() {
        let i = i as u32;
        *v = if i <= u32::from(lo) {
            0
        } else if i >= u32::from(hi) {
            255
        } else {
            ((i - u32::from(lo)) * 255 / span) as u8
        };
    }
    lut
}

/// ITU-R 601 luma in 16-bit fixed point.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

/// Blend each pixel away from its own grey by `factor` (1.0 = unchanged).
pub fn enhance_color(img: &mut RgbaImage, factor: f32) {
    for px in img.pixels_mut() {
        let [r, g, b, _] = px.0;
        let grey = luma(r, g, b);
        for c in 0..3 {
            px.0[c] = lerp_u8(grey, px.0[c], factor);
        }
    }
}

/// Blend each channel away from the image's mean luma by `factor`.
pub fn enhance_contrast(img: &mut RgbaImage, factor: f32) {
    let count = u64::from(img.width()) * u64::from(img.height());
    if count == 0 {
        return;
    }
    let total: u64 = img
        .pixels()
        .map(|p| u64::from(luma(p.0[0], p.0[1], p.0[2])))
        .sum();
    let mean = (total as f64 / count as f64 + 0.5) as u8;
    for px in img.pixels_mut() {
        for c in 0..3 {
            px.0[c] = lerp_u8(mean, px.0[c], factor);
        }
    }
}

fn lerp_u8(from: u8, to: u8, t: f32) -> u8 {
    let v = f32::from(from) + t * (f32::from(to) - f32::from(from));
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color_correct.rs"]
mod tests;
