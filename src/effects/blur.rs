use image::GrayImage;

use crate::foundation::error::{CardError, CardResult};

/// Separable Gaussian blur over a single 8-bit channel.
pub fn blur_gray8(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> CardResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| CardError::image("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(CardError::image(
            "blur_gray8 expects src matching width*height",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Gaussian blur of a mask with kernel radius `ceil(3 * sigma)`.
pub fn gaussian_blur_mask(mask: &GrayImage, sigma: f32) -> CardResult<GrayImage> {
    let (w, h) = mask.dimensions();
    let radius = (3.0 * sigma).ceil().max(0.0) as u32;
    let out = blur_gray8(mask.as_raw(), w, h, radius, sigma)?;
    GrayImage::from_raw(w, h, out).ok_or_else(|| CardError::image("blurred mask size mismatch"))
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CardResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CardError::image("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let two_var = 2.0 * f64::from(sigma) * f64::from(sigma);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-f64::from(i * i) / two_var).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return Err(CardError::image("gaussian kernel sum is zero"));
    }

    // Round the running sum instead of each tap so the taps add up to exactly 1.0 in Q16.
    let last = raw.len() - 1;
    let mut running = 0.0f64;
    let mut placed = 0u32;
    let mut kernel = Vec::with_capacity(raw.len());
    for (i, w) in raw.iter().enumerate() {
        running += w;
        let edge = if i == last {
            1 << 16
        } else {
            ((running / total) * 65536.0).round().clamp(0.0, 65536.0) as u32
        };
        let edge = edge.max(placed);
        kernel.push(edge - placed);
        placed = edge;
    }
    Ok(kernel)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                acc += u64::from(kw) * u64::from(src[(y * w + sx) as usize]);
            }
            dst[(y * w + x) as usize] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                acc += u64::from(kw) * u64::from(src[(sy * w + x) as usize]);
            }
            dst[(y * w + x) as usize] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
