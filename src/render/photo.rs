use image::RgbaImage;

use crate::{
    effects::{
        blur::gaussian_blur_mask,
        color_correct::auto_color_correct,
        composite::{matte, paste_masked},
        fit::{fit_to_box, scale_image},
        mask::{alpha_mask, min_filter_3x3, multiply, rounded_mask},
    },
    render::isolate::SubjectIsolator,
    template::model::PhotoBox,
};

/// Default photo enlargement relative to its box.
pub const DEFAULT_PHOTO_SCALE: f64 = 1.3;

/// Feather applied to cutout masks.
const CUTOUT_FEATHER_SIGMA: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Per-photo compositing switches.
pub struct PhotoOptions {
    /// Run automatic colour correction.
    pub auto_color: bool,
    /// Background removal was requested for this photo.
    pub remove_bg: bool,
    /// Opaque backing for cutouts; usually the canvas background.
    pub matte_rgb: Option<[u8; 3]>,
    /// Extra uniform scale applied after fitting; values <= 0 disable it.
    pub scale: f64,
}

impl Default for PhotoOptions {
    fn default() -> Self {
        Self {
            auto_color: true,
            remove_bg: false,
            matte_rgb: None,
            scale: DEFAULT_PHOTO_SCALE,
        }
    }
}

/// Fit, style and paste one photo into `bx`.
///
/// An enlarged photo is centred on the box and overflows it; it is not clipped
/// back to the box bounds.
pub fn paste_photo(
    canvas: &mut RgbaImage,
    photo: RgbaImage,
    bx: &PhotoBox,
    opts: &PhotoOptions,
    isolator: &dyn SubjectIsolator,
) {
    let mut img = photo;
    if opts.remove_bg && isolator.is_available() {
        match isolator.isolate(&img) {
            Ok(cutout) => img = cutout,
            Err(err) => tracing::warn!(%err, "background removal failed; using original image"),
        }
    }

    img = auto_color_correct(&img, opts.auto_color);
    img = fit_to_box(&img, bx.width, bx.height);

    let scale = if opts.scale.is_finite() && opts.scale > 0.0 {
        img = scale_image(&img, opts.scale);
        opts.scale
    } else {
        1.0
    };

    let photo_alpha = alpha_mask(&img);
    let mut mask = match (opts.remove_bg, opts.matte_rgb) {
        (true, Some(rgb)) => {
            img = matte(&img, rgb, &photo_alpha);
            min_filter_3x3(&photo_alpha)
        }
        _ => photo_alpha,
    };

    if bx.border_radius > 0 {
        let radius = ((f64::from(bx.border_radius) * scale) as u32).max(1);
        let corners = rounded_mask(img.width(), img.height(), radius);
        mask = multiply(&mask, &corners);
    }

    if opts.remove_bg {
        match gaussian_blur_mask(&mask, CUTOUT_FEATHER_SIGMA) {
            Ok(soft) => mask = soft,
            Err(err) => tracing::warn!(%err, "mask feathering failed; keeping hard edge"),
        }
    }

    let (x, y) = centered_origin(bx, img.width(), img.height());
    paste_masked(canvas, &img, &mask, x, y);
}

/// Top-left corner that centres a `w` x `h` image on the box footprint.
/// Negative (outward) when the image is larger than the box.
pub fn centered_origin(bx: &PhotoBox, w: u32, h: u32) -> (i64, i64) {
    let dx = (i64::from(bx.width) - i64::from(w)).div_euclid(2);
    let dy = (i64::from(bx.height) - i64::from(h)).div_euclid(2);
    (i64::from(bx.x) + dx, i64::from(bx.y) + dy)
}

#[cfg(test)]
#[path = "../../tests/unit/render/photo.rs"]
mod tests;
