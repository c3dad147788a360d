use image::{
    RgbaImage,
    imageops::{self, FilterType},
};

/// Scale `img` to cover a `width` x `height` box, keeping its aspect ratio, then
/// centre-crop to exactly the box.
///
/// The result is always `width` x `height`; excess is cut evenly from both sides
/// of the overflowing axis.
pub fn fit_to_box(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let width = width.max(1);
    let height = height.max(1);
    let (src_w, src_h) = img.dimensions();
    if src_w == 0 || src_h == 0 {
        return RgbaImage::new(width, height);
    }

    let img_ratio = f64::from(src_w) / f64::from(src_h);
    let target_ratio = f64::from(width) / f64::from(height);

    let (new_w, new_h) = if img_ratio > target_ratio {
        let w = (f64::from(height) * img_ratio) as u32;
        (w.max(width), height)
    } else {
        let h = (f64::from(width) / img_ratio) as u32;
        (width, h.max(height))
    };

    let resized = if (new_w, new_h) == (src_w, src_h) {
        img.clone()
    } else {
        imageops::resize(img, new_w, new_h, FilterType::Lanczos3)
    };
    let left = (new_w - width) / 2;
    let top = (new_h - height) / 2;
    imageops::crop_imm(&resized, left, top, width, height).to_image()
}

/// Resize by a uniform factor (minimum 1x1). Non-positive or non-finite factors
/// leave the image untouched.
pub fn scale_image(img: &RgbaImage, scale: f64) -> RgbaImage {
    if !(scale.is_finite() && scale > 0.0) {
        return img.clone();
    }
    let (w, h) = img.dimensions();
    let new_w = ((f64::from(w) * scale) as u32).max(1);
    let new_h = ((f64::from(h) * scale) as u32).max(1);
    if (new_w, new_h) == (w, h) {
        return img.clone();
    }
    imageops::resize(img, new_w, new_h, FilterType::Lanczos3)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fit.rs"]
mod tests;
