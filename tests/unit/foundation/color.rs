use super::*;

#[test]
fn short_and_long_hex_agree() {
    assert_eq!(hex_to_rgb("#abc"), hex_to_rgb("#aabbcc"));
    assert_eq!(hex_to_rgb("#abc"), [0xaa, 0xbb, 0xcc]);
}

#[test]
fn malformed_hex_yields_default_matte() {
    for bad in ["", "abc", "#ab", "#abcd", "#zzzzzz", "#12345678", "  ", "#ééé"] {
        assert_eq!(hex_to_rgb(bad), DEFAULT_MATTE_RGB, "input {bad:?}");
    }
}

#[test]
fn hex_to_rgb_trims_whitespace() {
    assert_eq!(hex_to_rgb("  #102030 "), [0x10, 0x20, 0x30]);
}

#[test]
fn parse_color_accepts_alpha_forms() {
    assert_eq!(parse_color("#ff0000").unwrap(), [255, 0, 0, 255]);
    assert_eq!(parse_color("#0000ff80").unwrap(), [0, 0, 255, 128]);
    assert_eq!(parse_color("#f008").unwrap(), [255, 0, 0, 0x88]);
    assert_eq!(
        parse_color(DEFAULT_TEXT_COLOR).unwrap(),
        [0x1f, 0x2d, 0x3d, 255]
    );
}

#[test]
fn parse_color_rejects_names_and_bad_lengths() {
    assert!(parse_color("white").is_err());
    assert!(parse_color("#12").is_err());
    assert!(parse_color("#gg0000").is_err());
}
