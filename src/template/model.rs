use std::{collections::BTreeMap, path::PathBuf};

use serde_json::{Map, Value};

use crate::foundation::{
    color::DEFAULT_BG_COLOR,
    error::{CardError, CardResult},
};

/// Canvas size used when the template omits `canvas.width`.
pub const DEFAULT_CANVAS_WIDTH: u32 = 1600;
/// Canvas size used when the template omits `canvas.height`.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 900;
/// Text size used when a block omits `size`.
pub const DEFAULT_TEXT_SIZE: u32 = 48;

#[derive(Clone, Debug, PartialEq)]
/// A fully parsed card template.
///
/// Templates are plain values: every job renders from its own clone so that
/// per-job adjustments (see [`Template::scale_text`]) never reach the shared copy.
pub struct Template {
    /// Base surface settings.
    pub canvas: CanvasSpec,
    /// Photo slots; the Nth photo of a job fills the Nth box.
    pub photo_boxes: Vec<PhotoBox>,
    /// Named text blocks.
    pub text_blocks: BTreeMap<String, TextBlock>,
    /// Decorative images in template order.
    pub overlays: Vec<Overlay>,
}

#[derive(Clone, Debug, PartialEq)]
/// Base surface settings.
pub struct CanvasSpec {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Fill colour (hex) for the flat surface and the photo matte.
    pub background_color: String,
    /// Optional background image stretched to the canvas size.
    pub template_path: Option<PathBuf>,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            background_color: DEFAULT_BG_COLOR.to_owned(),
            template_path: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Rectangle in canvas coordinates that one photo is fitted into.
pub struct PhotoBox {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Box width (> 0).
    pub width: u32,
    /// Box height (> 0).
    pub height: u32,
    /// Corner rounding radius; 0 keeps square corners.
    pub border_radius: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal alignment of lines inside a text block.
pub enum Align {
    /// Lines start at the block's x.
    #[default]
    Left,
    /// Lines are centred within the widest line.
    Center,
    /// Lines end flush with the widest line.
    Right,
}

#[derive(Clone, Debug, PartialEq)]
/// A named text block with `{placeholder}` tokens.
pub struct TextBlock {
    /// Template text; `\n` (backslash, n) separates lines.
    pub text: String,
    /// Left edge of the block.
    pub x: i32,
    /// Top edge of the first line.
    pub y: i32,
    /// Font file; the built-in bitmap font is used when absent or unreadable.
    pub font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub size: u32,
    /// Fill colour as hex.
    pub color: String,
    /// Line alignment.
    pub align: Align,
    /// Reserved for wrapping; parsed but not applied.
    pub max_width: Option<u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Stage at which an overlay is composited.
pub enum Placement {
    /// Under the photos.
    BeforePhotos,
    /// Over the photos, under the text.
    #[default]
    AfterPhotos,
    /// Over everything.
    Top,
}

#[derive(Clone, Debug, PartialEq)]
/// Decorative image placed at an absolute position.
pub struct Overlay {
    /// Image file.
    pub path: PathBuf,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Explicit width; native width when `None`.
    pub width: Option<u32>,
    /// Explicit height; native height when `None`.
    pub height: Option<u32>,
    /// Compositing stage.
    pub placement: Placement,
}

impl Template {
    /// Build a typed template from a raw document tree.
    ///
    /// Missing top-level sections default to empty. Required geometry fields are
    /// checked here so malformed templates fail before any job renders.
    pub fn from_value(doc: &Value) -> CardResult<Self> {
        let empty = Map::new();
        let root = match doc {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => return Err(CardError::config("template root must be a mapping")),
        };

        let canvas = match root.get("canvas") {
            None | Some(Value::Null) => CanvasSpec::default(),
            Some(Value::Object(map)) => parse_canvas(map)?,
            Some(_) => return Err(CardError::config("canvas must be a mapping")),
        };

        let photo_boxes = seq(root.get("photo_boxes"), "photo_boxes")?
            .iter()
            .enumerate()
            .map(|(i, v)| parse_photo_box(mapping(v, &format!("photo_boxes[{i}]"))?, i))
            .collect::<CardResult<Vec<_>>>()?;

        let mut text_blocks = BTreeMap::new();
        match root.get("text_blocks") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (name, v) in map {
                    let ctx = format!("text_blocks.{name}");
                    text_blocks.insert(name.clone(), parse_text_block(mapping(v, &ctx)?, &ctx)?);
                }
            }
            Some(_) => return Err(CardError::config("text_blocks must be a mapping")),
        }

        let mut overlays = Vec::new();
        for (i, v) in seq(root.get("overlays"), "overlays")?.iter().enumerate() {
            let ctx = format!("overlays[{i}]");
            if let Some(overlay) = parse_overlay(mapping(v, &ctx)?, &ctx)? {
                overlays.push(overlay);
            }
        }

        Ok(Self {
            canvas,
            photo_boxes,
            text_blocks,
            overlays,
        })
    }

    /// Point every text block at `font_path`.
    pub fn override_font(&mut self, font_path: impl Into<PathBuf>) {
        let font_path = font_path.into();
        for block in self.text_blocks.values_mut() {
            block.font_path = Some(font_path.clone());
        }
    }

    /// Multiply every text size by `factor`, rounding half to even, minimum 1.
    pub fn scale_text(&mut self, factor: f64) {
        if factor == 1.0 || !factor.is_finite() {
            return;
        }
        for block in self.text_blocks.values_mut() {
            let scaled = (f64::from(block.size) * factor).round_ties_even();
            block.size = scaled.clamp(1.0, f64::from(u32::MAX)) as u32;
        }
    }
}

fn seq<'a>(value: Option<&'a Value>, ctx: &str) -> CardResult<&'a [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(CardError::config(format!("{ctx} must be a sequence"))),
    }
}

fn mapping<'a>(value: &'a Value, ctx: &str) -> CardResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CardError::config(format!("{ctx} must be a mapping")))
}

/// Integer coercion matching what template authors write: ints, floats
/// (truncated toward zero) and numeric strings.
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

fn required_int(map: &Map<String, Value>, key: &str, ctx: &str) -> CardResult<i64> {
    let value = map
        .get(key)
        .ok_or_else(|| CardError::config(format!("{ctx}: missing required field '{key}'")))?;
    coerce_int(value)
        .ok_or_else(|| CardError::config(format!("{ctx}: field '{key}' must be numeric")))
}

fn optional_int(map: &Map<String, Value>, key: &str, ctx: &str) -> CardResult<Option<i64>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => coerce_int(v)
            .map(Some)
            .ok_or_else(|| CardError::config(format!("{ctx}: field '{key}' must be numeric"))),
    }
}

fn optional_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

fn to_coord(v: i64, key: &str, ctx: &str) -> CardResult<i32> {
    i32::try_from(v).map_err(|_| CardError::config(format!("{ctx}: field '{key}' out of range")))
}

fn to_extent(v: i64, key: &str, ctx: &str) -> CardResult<u32> {
    if v <= 0 {
        return Err(CardError::config(format!("{ctx}: field '{key}' must be > 0")));
    }
    u32::try_from(v).map_err(|_| CardError::config(format!("{ctx}: field '{key}' out of range")))
}

fn parse_canvas(map: &Map<String, Value>) -> CardResult<CanvasSpec> {
    let ctx = "canvas";
    let width = match optional_int(map, "width", ctx)? {
        Some(v) => to_extent(v, "width", ctx)?,
        None => DEFAULT_CANVAS_WIDTH,
    };
    let height = match optional_int(map, "height", ctx)? {
        Some(v) => to_extent(v, "height", ctx)?,
        None => DEFAULT_CANVAS_HEIGHT,
    };
    let background_color = match map.get("background_color") {
        None | Some(Value::Null) => DEFAULT_BG_COLOR.to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            tracing::warn!(value = %other, "canvas background_color is not a string; using default");
            DEFAULT_BG_COLOR.to_owned()
        }
    };
    let template_path = optional_str(map, "template_path")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    Ok(CanvasSpec {
        width,
        height,
        background_color,
        template_path,
    })
}

fn parse_photo_box(map: &Map<String, Value>, index: usize) -> CardResult<PhotoBox> {
    let ctx = format!("photo_boxes[{index}]");
    let x = required_int(map, "x", &ctx)?;
    let y = required_int(map, "y", &ctx)?;
    let width = required_int(map, "width", &ctx)?;
    let height = required_int(map, "height", &ctx)?;
    let border_radius = optional_int(map, "border_radius", &ctx)?.unwrap_or(0);

    Ok(PhotoBox {
        x: to_coord(x, "x", &ctx)?,
        y: to_coord(y, "y", &ctx)?,
        width: to_extent(width, "width", &ctx)?,
        height: to_extent(height, "height", &ctx)?,
        border_radius: u32::try_from(border_radius.max(0)).unwrap_or(u32::MAX),
    })
}

fn parse_text_block(map: &Map<String, Value>, ctx: &str) -> CardResult<TextBlock> {
    let text = match map.get("text") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(_) => return Err(CardError::config(format!("{ctx}: field 'text' must be a string"))),
        None => {
            return Err(CardError::config(format!(
                "{ctx}: missing required field 'text'"
            )));
        }
    };
    let x = to_coord(required_int(map, "x", ctx)?, "x", ctx)?;
    let y = to_coord(required_int(map, "y", ctx)?, "y", ctx)?;

    let size = match optional_int(map, "size", ctx)? {
        Some(v) => u32::try_from(v.max(1)).unwrap_or(u32::MAX),
        None => DEFAULT_TEXT_SIZE,
    };
    let color = optional_str(map, "color")
        .unwrap_or(crate::foundation::color::DEFAULT_TEXT_COLOR)
        .to_owned();
    let align = match map.get("align") {
        None | Some(Value::Null) => Align::Left,
        Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|_| {
            tracing::warn!(block = ctx, value = %v, "unknown text alignment; using left");
            Align::Left
        }),
    };
    let max_width = optional_int(map, "max_width", ctx)?
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok());

    Ok(TextBlock {
        text,
        x,
        y,
        font_path: optional_str(map, "font_path")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
        size,
        color,
        align,
        max_width,
    })
}

fn parse_overlay(map: &Map<String, Value>, ctx: &str) -> CardResult<Option<Overlay>> {
    let path = optional_str(map, "path")
        .ok_or_else(|| CardError::config(format!("{ctx}: missing required field 'path'")))?;
    let x = to_coord(required_int(map, "x", ctx)?, "x", ctx)?;
    let y = to_coord(required_int(map, "y", ctx)?, "y", ctx)?;
    let dim = |key: &str| -> CardResult<Option<u32>> {
        Ok(optional_int(map, key, ctx)?
            .filter(|v| *v > 0)
            .and_then(|v| u32::try_from(v).ok()))
    };
    let width = dim("width")?;
    let height = dim("height")?;

    let placement = match map.get("placement") {
        None | Some(Value::Null) => Placement::AfterPhotos,
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(p) => p,
            Err(_) => {
                tracing::warn!(overlay = ctx, value = %v, "unknown overlay placement; overlay skipped");
                return Ok(None);
            }
        },
    };

    Ok(Some(Overlay {
        path: PathBuf::from(path),
        x,
        y,
        width,
        height,
        placement,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
