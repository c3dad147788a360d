use image::{
    Rgba, RgbaImage,
    imageops::{self, FilterType},
};

use crate::{
    assets::decode::{AssetLoadError, load_rgba},
    foundation::color::{DEFAULT_BG_COLOR, DEFAULT_MATTE_RGB, parse_color},
    template::model::CanvasSpec,
};

/// Build the base surface for one card.
///
/// A readable `template_path` image wins and is stretched to the canvas size;
/// otherwise the surface is a flat fill of `background_color`.
pub fn create_base_canvas(spec: &CanvasSpec) -> RgbaImage {
    if let Some(path) = &spec.template_path {
        match load_rgba(path) {
            Ok(img) => {
                if img.dimensions() == (spec.width, spec.height) {
                    return img;
                }
                return imageops::resize(&img, spec.width, spec.height, FilterType::Lanczos3);
            }
            Err(err @ AssetLoadError::NotFound(_)) => {
                tracing::warn!(%err, "template image not found, using solid background");
            }
            Err(err) => {
                tracing::warn!(%err, "template image unreadable, using solid background");
            }
        }
    }

    RgbaImage::from_pixel(spec.width, spec.height, Rgba(background_rgba(spec)))
}

fn background_rgba(spec: &CanvasSpec) -> [u8; 4] {
    parse_color(&spec.background_color).unwrap_or_else(|e| {
        tracing::warn!(
            color = %spec.background_color,
            error = %e,
            "unreadable canvas colour, using {DEFAULT_BG_COLOR}"
        );
        let [r, g, b] = DEFAULT_MATTE_RGB;
        [r, g, b, 255]
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
