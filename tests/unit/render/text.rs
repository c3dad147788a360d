use image::Rgba;

use super::*;

fn values() -> BTreeMap<String, String> {
    [
        ("recipient_name", "Alex"),
        ("giver_name", "Sam"),
        ("message", "Great work"),
        ("project_name", "Atlas"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect()
}

fn block(text: &str, align: Align) -> TextBlock {
    TextBlock {
        text: text.to_owned(),
        x: 10,
        y: 5,
        font_path: None,
        size: 16,
        color: "#000000".to_owned(),
        align,
        max_width: None,
    }
}

fn inked_columns(canvas: &RgbaImage, rows: std::ops::Range<u32>) -> Option<(u32, u32)> {
    let xs: Vec<u32> = canvas
        .enumerate_pixels()
        .filter(|(_, y, p)| rows.contains(y) && p.0 != [255, 255, 255, 255])
        .map(|(x, _, _)| x)
        .collect();
    Some((*xs.iter().min()?, *xs.iter().max()?))
}

#[test]
fn substitutes_named_placeholders() {
    let out = substitute("Thanks {recipient_name}, from {giver_name}!", &values()).unwrap();
    assert_eq!(out, "Thanks Alex, from Sam!");
}

#[test]
fn doubled_braces_are_literal() {
    assert_eq!(substitute("{{{project_name}}}", &values()).unwrap(), "{Atlas}");
}

#[test]
fn format_spec_pads_and_truncates() {
    let v = values();
    assert_eq!(substitute("[{giver_name:>5}]", &v).unwrap(), "[  Sam]");
    assert_eq!(substitute("[{giver_name:*^7}]", &v).unwrap(), "[**Sam**]");
    assert_eq!(substitute("[{message:.5}]", &v).unwrap(), "[Great]");
    assert_eq!(substitute("[{giver_name:05}]", &v).unwrap(), "[Sam00]");
    assert_eq!(substitute("{giver_name!r}", &v).unwrap(), "'Sam'");
}

#[test]
fn unknown_placeholder_is_a_substitution_error() {
    let err = substitute("Hi {nickname}", &values()).unwrap_err();
    assert!(matches!(err, CardError::Substitution(_)));
    assert!(err.to_string().contains("nickname"));
}

#[test]
fn malformed_fields_are_substitution_errors() {
    for bad in ["{}", "{0}", "open {", "close }", "{giver_name:d}", "{giver_name!x}"] {
        let err = substitute(bad, &values()).unwrap_err();
        assert!(matches!(err, CardError::Substitution(_)), "{bad}: {err}");
    }
}

#[test]
fn splits_only_on_literal_backslash_n() {
    assert_eq!(split_lines("a\\nb\\n\\nc"), vec!["a", "b", "", "c"]);
    assert_eq!(split_lines("real\nnewline"), vec!["real\nnewline"]);
}

#[test]
fn spacing_is_truncated_fraction_of_size() {
    assert_eq!(line_spacing(48), 19);
    assert_eq!(line_spacing(16), 6);
    assert_eq!(line_spacing(1), 0);
}

#[test]
fn lines_stack_by_ascent_plus_spacing() {
    let mut canvas = RgbaImage::from_pixel(120, 80, Rgba([255, 255, 255, 255]));
    draw_text_block(&mut canvas, &block("H\\nH", Align::Left), &values()).unwrap();
    // 16px bitmap font: ascent 16, spacing 6, so line two starts at y = 5 + 22.
    assert!(inked_columns(&canvas, 5..21).is_some());
    assert!(inked_columns(&canvas, 21..27).is_none());
    assert!(inked_columns(&canvas, 27..43).is_some());
}

#[test]
fn right_alignment_is_relative_to_widest_line() {
    let mut canvas = RgbaImage::from_pixel(120, 80, Rgba([255, 255, 255, 255]));
    draw_text_block(&mut canvas, &block("HHHH\\nH", Align::Right), &values()).unwrap();
    let (_, first_max) = inked_columns(&canvas, 5..21).unwrap();
    let (second_min, second_max) = inked_columns(&canvas, 27..43).unwrap();
    assert!(second_min >= 10 + 24, "second line starts at {second_min}");
    assert!(second_max.abs_diff(first_max) <= 1);
}

#[test]
fn center_alignment_offsets_short_lines() {
    let mut canvas = RgbaImage::from_pixel(120, 80, Rgba([255, 255, 255, 255]));
    draw_text_block(&mut canvas, &block("HHHH\\nH", Align::Center), &values()).unwrap();
    let (second_min, _) = inked_columns(&canvas, 27..43).unwrap();
    assert!((10 + 12..10 + 20).contains(&second_min), "got {second_min}");
}

#[test]
fn larger_size_draws_wider_text() {
    let mut small = RgbaImage::from_pixel(200, 80, Rgba([255, 255, 255, 255]));
    let mut large = small.clone();
    draw_text_block(&mut small, &block("{giver_name}", Align::Left), &values()).unwrap();
    let big = TextBlock {
        size: 32,
        ..block("{giver_name}", Align::Left)
    };
    draw_text_block(&mut large, &big, &values()).unwrap();
    let (_, small_max) = inked_columns(&small, 0..80).unwrap();
    let (_, large_max) = inked_columns(&large, 0..80).unwrap();
    assert!(large_max > small_max);
}

#[test]
fn bad_colour_falls_back_to_default_text_colour() {
    let mut canvas = RgbaImage::from_pixel(60, 40, Rgba([255, 255, 255, 255]));
    let b = TextBlock {
        color: "tomato".to_owned(),
        ..block("H", Align::Left)
    };
    draw_text_block(&mut canvas, &b, &values()).unwrap();
    assert!(canvas.pixels().any(|p| p.0 == [0x1f, 0x2d, 0x3d, 255]));
}

#[test]
fn substitution_error_leaves_canvas_untouched() {
    let mut canvas = RgbaImage::from_pixel(30, 30, Rgba([255, 255, 255, 255]));
    let before = canvas.clone();
    assert!(draw_text_block(&mut canvas, &block("{missing}", Align::Left), &values()).is_err());
    assert_eq!(canvas, before);
}
