use std::path::Path;

use ab_glyph::{Font as _, FontArc, PxScale, ScaleFont as _};
use anyhow::Context as _;
use image::RgbaImage;
use spleen_font::{FONT_8X16, PSF2Font};

use crate::effects::composite::over;

/// Cell size of the built-in bitmap font.
const BITMAP_CELL: (u32, u32) = (8, 16);

/// A font ready to lay out and draw single lines at a fixed size.
#[derive(Clone, Debug)]
pub enum CardFont {
    /// Scalable TrueType/OpenType face.
    Outline {
        /// Parsed face.
        font: FontArc,
        /// Glyph scale for the requested em size.
        scale: PxScale,
    },
    /// Built-in Spleen 8x16 bitmap font, magnified by an integer factor.
    Bitmap {
        /// Pixel magnification (>= 1).
        factor: u32,
    },
}

impl CardFont {
    /// Outline font sized so that one em spans `size` pixels.
    pub fn outline(font: FontArc, size: u32) -> Self {
        let size = size.max(1) as f32;
        let scale = match font.units_per_em() {
            Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
            _ => PxScale::from(size),
        };
        Self::Outline { font, scale }
    }

    /// Bitmap fallback magnified to roughly `size` pixels tall.
    pub fn bitmap(size: u32) -> Self {
        let factor = (f64::from(size) / f64::from(BITMAP_CELL.1)).round() as u32;
        Self::Bitmap {
            factor: factor.max(1),
        }
    }

    /// Distance from the top of a line to its baseline, in pixels.
    pub fn ascent(&self) -> i64 {
        match self {
            Self::Outline { font, scale } => font.as_scaled(*scale).ascent().round() as i64,
            Self::Bitmap { factor } => i64::from(BITMAP_CELL.1 * factor),
        }
    }

    /// Horizontal advance of `line`, kerning included.
    pub fn line_width(&self, line: &str) -> i64 {
        match self {
            Self::Outline { font, scale } => {
                let scaled = font.as_scaled(*scale);
                let mut width = 0.0f32;
                let mut prev = None;
                for ch in line.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(p) = prev {
                        width += scaled.kern(p, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width.round() as i64
            }
            Self::Bitmap { factor } => {
                line.chars().count() as i64 * i64::from(BITMAP_CELL.0 * factor)
            }
        }
    }

    /// Draw `line` with its top-left at (`x`, `y`) in straight-alpha `color`.
    /// Glyph coverage scales the colour's alpha; pixels off the canvas are dropped.
    pub fn draw_line(&self, canvas: &mut RgbaImage, line: &str, x: i64, y: i64, color: [u8; 4]) {
        match self {
            Self::Outline { font, scale } => draw_outline(canvas, font, *scale, line, x, y, color),
            Self::Bitmap { factor } => draw_bitmap(canvas, *factor, line, x, y, color),
        }
    }
}

/// Load the font at `path`, or the bitmap fallback when there is no path or it
/// cannot be read.
pub fn load_font(path: Option<&Path>, size: u32) -> CardFont {
    let Some(path) = path else {
        return CardFont::bitmap(size);
    };
    match read_outline(path) {
        Ok(font) => CardFont::outline(font, size),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "could not load font, using built-in bitmap font"
            );
            CardFont::bitmap(size)
        }
    }
}

fn read_outline(path: &Path) -> anyhow::Result<FontArc> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    FontArc::try_from_vec(bytes).with_context(|| format!("parse font '{}'", path.display()))
}

fn blend_px(canvas: &mut RgbaImage, x: i64, y: i64, color: [u8; 4], coverage: f32) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    let a = (f32::from(color[3]) * coverage.clamp(0.0, 1.0)).round() as u8;
    if a == 0 {
        return;
    }
    let px = canvas.get_pixel_mut(x as u32, y as u32);
    px.0 = over(px.0, [color[0], color[1], color[2], a]);
}

fn draw_outline(
    canvas: &mut RgbaImage,
    font: &FontArc,
    scale: PxScale,
    line: &str,
    x: i64,
    y: i64,
    color: [u8; 4],
) {
    let scaled = font.as_scaled(scale);
    let baseline = y as f32 + scaled.ascent();
    let mut caret = x as f32;
    let mut prev = None;
    for ch in line.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, baseline));
        caret += scaled.h_advance(id);
        prev = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (ox, oy) = (bounds.min.x as i64, bounds.min.y as i64);
            outlined.draw(|gx, gy, coverage| {
                blend_px(canvas, ox + i64::from(gx), oy + i64::from(gy), color, coverage);
            });
        }
    }
}

/// Rows of the 8x16 cell for `ch`; `None` when the font has no glyph.
fn bitmap_rows(ch: char) -> Option<Vec<Vec<bool>>> {
    let mut font = PSF2Font::new(FONT_8X16).ok()?;
    let mut utf8 = [0u8; 4];
    let glyph = font.glyph_for_utf8(ch.encode_utf8(&mut utf8).as_bytes())?;
    Some(glyph.map(|row| row.collect()).collect())
}

fn draw_bitmap(canvas: &mut RgbaImage, factor: u32, line: &str, x: i64, y: i64, color: [u8; 4]) {
    let f = i64::from(factor);
    let cell_w = i64::from(BITMAP_CELL.0) * f;
    for (i, ch) in line.chars().enumerate() {
        let Some(rows) = bitmap_rows(ch).or_else(|| bitmap_rows('?')) else {
            continue;
        };
        let left = x + i as i64 * cell_w;
        for (ry, row) in rows.iter().enumerate() {
            for (rx, on) in row.iter().enumerate() {
                if !on {
                    continue;
                }
                let px = left + rx as i64 * f;
                let py = y + ry as i64 * f;
                for dy in 0..f {
                    for dx in 0..f {
                        blend_px(canvas, px + dx, py + dy, color, 1.0);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/font.rs"]
mod tests;
