/// Canvas fill used when the template does not name one.
pub const DEFAULT_BG_COLOR: &str = "#f5f6fa";

/// Text fill used when a block does not name one.
pub const DEFAULT_TEXT_COLOR: &str = "#1f2d3d";

/// RGB returned by [`hex_to_rgb`] for anything it cannot read.
pub const DEFAULT_MATTE_RGB: [u8; 3] = [245, 246, 250];

/// Lenient `#rgb` / `#rrggbb` parser used for the background matte.
///
/// Any other form (missing `#`, wrong length, non-hex digits) yields
/// [`DEFAULT_MATTE_RGB`].
pub fn hex_to_rgb(color: &str) -> [u8; 3] {
    let color = color.trim();
    let Some(digits) = color.strip_prefix('#') else {
        return DEFAULT_MATTE_RGB;
    };
    match digits.len() {
        3 | 6 => match parse_hex(digits) {
            Ok([r, g, b, _]) => [r, g, b],
            Err(_) => DEFAULT_MATTE_RGB,
        },
        _ => DEFAULT_MATTE_RGB,
    }
}

/// Strict colour parser: `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` into straight RGBA8.
pub fn parse_color(color: &str) -> Result<[u8; 4], String> {
    let s = color.trim();
    let digits = s
        .strip_prefix('#')
        .ok_or_else(|| format!("colour \"{s}\" must start with '#'"))?;
    parse_hex(digits)
}

fn parse_hex(digits: &str) -> Result<[u8; 4], String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }

    if !digits.is_ascii() {
        return Err(format!("invalid hex colour \"#{digits}\""));
    }

    match digits.len() {
        3 | 4 => {
            let r = hex_nibble(&digits[0..1])?;
            let g = hex_nibble(&digits[1..2])?;
            let b = hex_nibble(&digits[2..3])?;
            let a = if digits.len() == 4 {
                hex_nibble(&digits[3..4])?
            } else {
                255
            };
            Ok([r, g, b, a])
        }
        6 | 8 => {
            let r = hex_byte(&digits[0..2])?;
            let g = hex_byte(&digits[2..4])?;
            let b = hex_byte(&digits[4..6])?;
            let a = if digits.len() == 8 {
                hex_byte(&digits[6..8])?
            } else {
                255
            };
            Ok([r, g, b, a])
        }
        _ => Err("hex colour must be #rgb, #rgba, #rrggbb or #rrggbbaa".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
