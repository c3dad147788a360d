//! Placeholder substitution and multi-line text layout.
//!
//! Placeholders use brace formatting: `{name}` inserts a value, `{{` and `}}`
//! are literal braces and `{name:spec}` pads or truncates the value with the
//! usual `[[fill]align][0][width][.precision][s]` string spec.

use std::collections::BTreeMap;

use image::RgbaImage;

use crate::{
    foundation::{
        color::{DEFAULT_TEXT_COLOR, parse_color},
        error::{CardError, CardResult},
    },
    render::font::load_font,
    template::model::{Align, TextBlock},
};

/// Two-character sequence (backslash, `n`) that separates lines in block text.
pub const LINE_BREAK: &str = "\\n";

/// Extra gap between lines, relative to the font size.
const LINE_SPACING_RATIO: f64 = 0.4;

/// Fill every `{placeholder}` in `template` from `values`.
///
/// Unknown names, empty or positional fields, unbalanced braces and
/// unsupported format specs are [`CardError::Substitution`] errors.
pub fn substitute(template: &str, values: &BTreeMap<String, String>) -> CardResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(CardError::substitution(format!(
                    "single '}}' encountered in \"{template}\""
                )));
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => {
                            return Err(CardError::substitution(format!(
                                "nested replacement field in \"{template}\""
                            )));
                        }
                        Some(c) => field.push(c),
                        None => {
                            return Err(CardError::substitution(format!(
                                "unmatched '{{' in \"{template}\""
                            )));
                        }
                    }
                }
                out.push_str(&render_field(&field, values)?);
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

fn render_field(field: &str, values: &BTreeMap<String, String>) -> CardResult<String> {
    let (head, spec) = match field.split_once(':') {
        Some((head, spec)) => (head, Some(spec)),
        None => (field, None),
    };
    let (name, conversion) = match head.split_once('!') {
        Some((name, conv)) => (name, Some(conv)),
        None => (head, None),
    };

    if name.is_empty() || name.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardError::substitution(format!(
            "positional field '{{{field}}}' has no value; use a named placeholder"
        )));
    }
    let value = values
        .get(name)
        .ok_or_else(|| CardError::substitution(format!("unknown placeholder '{name}'")))?;

    let value = match conversion {
        None | Some("s") => value.clone(),
        Some("r") | Some("a") => format!("'{value}'"),
        Some(other) => {
            return Err(CardError::substitution(format!(
                "unknown conversion '!{other}' in '{{{field}}}'"
            )));
        }
    };

    match spec {
        None | Some("") => Ok(value),
        Some(spec) => apply_format_spec(&value, spec)
            .ok_or_else(|| CardError::substitution(format!("invalid format spec '{spec}' for '{name}'"))),
    }
}

fn apply_format_spec(value: &str, spec: &str) -> Option<String> {
    let chars: Vec<char> = spec.chars().collect();
    let mut i = 0;
    let is_align = |c: char| matches!(c, '<' | '>' | '^');

    let (mut fill, mut align) = (' ', '<');
    if chars.len() >= 2 && is_align(chars[1]) {
        fill = chars[0];
        align = chars[1];
        i = 2;
    } else if chars.first().copied().is_some_and(is_align) {
        align = chars[0];
        i = 1;
    }

    if chars.get(i) == Some(&'0') && i == 0 {
        fill = '0';
        i += 1;
    }

    let mut width = 0usize;
    while let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
        width = width.checked_mul(10)?.checked_add(d as usize)?;
        i += 1;
    }

    let mut precision = None;
    if chars.get(i) == Some(&'.') {
        i += 1;
        let start = i;
        let mut p = 0usize;
        while let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
            p = p.checked_mul(10)?.checked_add(d as usize)?;
            i += 1;
        }
        if i == start {
            return None;
        }
        precision = Some(p);
    }

    match &chars[i..] {
        [] | ['s'] => {}
        _ => return None,
    }

    let body: String = match precision {
        Some(p) => value.chars().take(p).collect(),
        None => value.to_owned(),
    };
    let len = body.chars().count();
    if len >= width {
        return Some(body);
    }
    let pad = width - len;
    let (left, right) = match align {
        '>' => (pad, 0),
        '^' => (pad / 2, pad - pad / 2),
        _ => (0, pad),
    };
    let mut out = String::with_capacity(body.len() + pad);
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(&body);
    out.extend(std::iter::repeat_n(fill, right));
    Some(out)
}

/// Split substituted text on the literal [`LINE_BREAK`] sequence.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(LINE_BREAK).collect()
}

/// Vertical gap added between lines at `size`.
pub fn line_spacing(size: u32) -> i64 {
    (f64::from(size) * LINE_SPACING_RATIO) as i64
}

/// Substitute, lay out and draw one text block.
///
/// Lines are top-anchored at the block position and advance by the font ascent
/// plus [`line_spacing`]. Center and right alignment are relative to the widest
/// line.
pub fn draw_text_block(
    canvas: &mut RgbaImage,
    block: &TextBlock,
    values: &BTreeMap<String, String>,
) -> CardResult<()> {
    let text = substitute(&block.text, values)?;
    let color = text_color(&block.color);
    let font = load_font(block.font_path.as_deref(), block.size);

    let lines = split_lines(&text);
    let widths: Vec<i64> = lines.iter().map(|l| font.line_width(l)).collect();
    let widest = widths.iter().copied().max().unwrap_or(0);
    let advance = font.ascent() + line_spacing(block.size);

    let mut y = i64::from(block.y);
    for (line, width) in lines.iter().zip(widths) {
        let x = i64::from(block.x)
            + match block.align {
                Align::Left => 0,
                Align::Center => (widest - width) / 2,
                Align::Right => widest - width,
            };
        font.draw_line(canvas, line, x, y, color);
        y += advance;
    }
    Ok(())
}

fn text_color(color: &str) -> [u8; 4] {
    parse_color(color).unwrap_or_else(|e| {
        tracing::warn!(color, error = %e, "unreadable text colour, using {DEFAULT_TEXT_COLOR}");
        parse_color(DEFAULT_TEXT_COLOR).unwrap_or([0x1f, 0x2d, 0x3d, 255])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
