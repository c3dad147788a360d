use image::{
    RgbaImage,
    imageops::{self, FilterType},
};

use crate::{
    assets::decode::load_rgba,
    effects::composite::alpha_composite_at,
    template::model::{Overlay, Placement},
};

/// Alpha-composite one overlay at its absolute position.
///
/// Missing or unreadable files are logged and skipped.
pub fn paste_overlay(canvas: &mut RgbaImage, overlay: &Overlay) {
    let img = match load_rgba(&overlay.path) {
        Ok(img) => img,
        Err(err) => {
            tracing::warn!(%err, "overlay skipped");
            return;
        }
    };

    let target_w = overlay.width.unwrap_or(img.width());
    let target_h = overlay.height.unwrap_or(img.height());
    let img = if img.dimensions() == (target_w, target_h) {
        img
    } else {
        imageops::resize(&img, target_w, target_h, FilterType::Lanczos3)
    };

    alpha_composite_at(canvas, &img, i64::from(overlay.x), i64::from(overlay.y));
}

/// Composite every overlay of the given stage, in template order.
pub fn paste_overlays(canvas: &mut RgbaImage, overlays: &[Overlay], stage: Placement) {
    for overlay in overlays.iter().filter(|o| o.placement == stage) {
        paste_overlay(canvas, overlay);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
