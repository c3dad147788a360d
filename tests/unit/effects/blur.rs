use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    let out = blur_gray8(&src, 3, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn kernel_taps_sum_to_one_and_mirror() {
    for (radius, sigma) in [(1, 0.5f32), (3, 1.0), (5, 1.5), (9, 3.0), (12, 0.7)] {
        let k = gaussian_kernel_q16(radius, sigma).unwrap();
        assert_eq!(k.len(), 2 * radius as usize + 1);
        assert_eq!(k.iter().sum::<u32>(), 1 << 16, "radius {radius} sigma {sigma}");
        for i in 0..k.len() / 2 {
            let (a, b) = (k[i], k[k.len() - 1 - i]);
            assert!(a.abs_diff(b) <= 1, "tap {i}: {a} vs {b}");
        }
        assert!(k.windows(2).take(radius as usize).all(|p| p[0] <= p[1]));
    }
}

#[test]
fn blur_constant_mask_is_identity() {
    let (w, h) = (6u32, 4u32);
    let src = vec![200u8; (w * h) as usize];
    let out = blur_gray8(&src, w, h, 5, 1.5).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[(3 * w + 3) as usize] = 255;

    let out = blur_gray8(&src, w, h, 3, 1.0).unwrap();
    assert!(out.iter().filter(|&&v| v != 0).count() > 1);
    let sum: u32 = out.iter().map(|&v| u32::from(v)).sum();
    assert!((sum as i32 - 255).abs() <= 8);
}

#[test]
fn blur_rejects_mismatched_buffer_and_bad_sigma() {
    assert!(blur_gray8(&[0u8; 5], 2, 2, 1, 1.0).is_err());
    assert!(blur_gray8(&[0u8; 4], 2, 2, 1, 0.0).is_err());
}

#[test]
fn mask_blur_softens_a_hard_edge() {
    let mask = GrayImage::from_fn(10, 1, |x, _| image::Luma([if x < 5 { 0 } else { 255 }]));
    let soft = gaussian_blur_mask(&mask, 1.5).unwrap();
    assert_eq!(soft.dimensions(), (10, 1));
    let v4 = soft.get_pixel(4, 0).0[0];
    let v5 = soft.get_pixel(5, 0).0[0];
    assert!(v4 > 0 && v4 < 255);
    assert!(v5 > 0 && v5 < 255);
    assert_eq!(soft.get_pixel(0, 0).0[0], 0);
}
