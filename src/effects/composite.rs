use image::{GrayImage, Rgba, RgbaImage};

/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Porter-Duff "source over destination" on straight (non-premultiplied) RGBA8.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let dst_w = u32::from(mul_div255(u16::from(dst[3]), 255 - sa as u16));
    let out_a = sa + dst_w;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * sa + u32::from(dst[i]) * dst_w;
        out[i] = ((c + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

/// Linear blend of every channel (alpha included): `mask` selects `src`, its
/// complement keeps `dst`.
pub fn blend(dst: Rgba8, src: Rgba8, mask: u8) -> Rgba8 {
    match mask {
        0 => dst,
        255 => src,
        m => {
            let m = u16::from(m);
            let inv = 255 - m;
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = add_sat_u8(
                    mul_div255(u16::from(src[i]), m),
                    mul_div255(u16::from(dst[i]), inv),
                );
            }
            out
        }
    }
}

/// Alpha-composite `src` onto `canvas` with its top-left at (`x`, `y`).
/// Parts falling outside the canvas are clipped.
pub fn alpha_composite_at(canvas: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    for_each_overlap(canvas, src, x, y, |d, s, _, _| over(d, s));
}

/// Paste `src` onto `canvas` at (`x`, `y`) through `mask`: every channel of the
/// destination moves toward `src` by the mask value. Clipped to the canvas.
pub fn paste_masked(canvas: &mut RgbaImage, src: &RgbaImage, mask: &GrayImage, x: i64, y: i64) {
    for_each_overlap(canvas, src, x, y, |d, s, sx, sy| {
        let m = mask.get_pixel_checked(sx, sy).map_or(0, |p| p.0[0]);
        blend(d, s, m)
    });
}

/// Composite `img` over an opaque `rgb` fill through `mask`, so no background
/// shows through where the mask is clear.
pub fn matte(img: &RgbaImage, rgb: [u8; 3], mask: &GrayImage) -> RgbaImage {
    let fill = [rgb[0], rgb[1], rgb[2], 255];
    let (w, h) = img.dimensions();
    RgbaImage::from_fn(w, h, |x, y| {
        let m = mask.get_pixel_checked(x, y).map_or(0, |p| p.0[0]);
        Rgba(blend(fill, img.get_pixel(x, y).0, m))
    })
}

fn for_each_overlap(
    canvas: &mut RgbaImage,
    src: &RgbaImage,
    x: i64,
    y: i64,
    mut f: impl FnMut(Rgba8, Rgba8, u32, u32) -> Rgba8,
) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(cw);
    let y1 = (y + sh).min(ch);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for cy in y0..y1 {
        for cx in x0..x1 {
            let (sx, sy) = ((cx - x) as u32, (cy - y) as u32);
            let s = src.get_pixel(sx, sy).0;
            let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
            dst.0 = f(dst.0, s, sx, sy);
        }
    }
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
