use super::*;
use crate::timeline::model::{Clip, ClipPayload};

fn shape_payload(kind: ShapeKind) -> ShapePayload {
    match Clip::shape("s", kind).payload {
        ClipPayload::Shape(s) => s,
        _ => unreachable!(),
    }
}

fn text_payload(content: &str) -> TextPayload {
    match Clip::text("t", content).payload {
        ClipPayload::Text(t) => t,
        _ => unreachable!(),
    }
}

#[test]
fn text_svg_escapes_markup() {
    let svg = text_svg(&text_payload("a < b & \"c\""));
    assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    assert!(svg.contains(r#"font-family="Arial""#));
    assert!(svg.contains(r##"fill="#ffffff""##));
}

#[test]
fn text_box_grows_with_content() {
    let short = text_box(&text_payload("a"));
    let long = text_box(&text_payload("abcdef"));
    assert!(long.0 > short.0);
    assert_eq!(short.1, long.1);
    assert_eq!(text_box(&text_payload("")).0, (48.0f64 * 0.6).ceil());
}

#[test]
fn shapes_rasterize_to_fixed_box() {
    let r = SvgRasterizer::with_fontdb(usvg::fontdb::Database::new());
    for kind in [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Triangle] {
        let img = r.rasterize_shape(&shape_payload(kind)).unwrap();
        assert_eq!((img.width, img.height), (100, 100));
        let idx = (50 * 100 + 50) * 4;
        // Centre is filled with #14b8a6.
        assert_eq!(&img.rgba8_premul[idx..idx + 4], &[0x14, 0xb8, 0xa6, 255]);
    }
}

#[test]
fn rectangle_corner_carries_stroke() {
    let r = SvgRasterizer::with_fontdb(usvg::fontdb::Database::new());
    let img = r.rasterize_shape(&shape_payload(ShapeKind::Rectangle)).unwrap();
    let idx = (1 * 100 + 50) * 4;
    assert_eq!(&img.rgba8_premul[idx..idx + 4], &[255, 255, 255, 255]);
}

#[test]
fn rasterize_svg_rejects_invalid_markup() {
    let r = SvgRasterizer::with_fontdb(usvg::fontdb::Database::new());
    assert!(r.rasterize_svg("<svg").is_err());
}

#[test]
fn control_characters_are_dropped_from_text() {
    let svg = text_svg(&text_payload("line\u{1}break\u{FFFF}\ttab"));
    assert!(svg.contains(">linebreak\ttab<"));

    let r = SvgRasterizer::with_fontdb(usvg::fontdb::Database::new());
    assert!(r.rasterize_text(&text_payload("line\u{1}break")).is_ok());
}

#[test]
fn oversized_text_is_rasterized_at_reduced_scale() {
    let mut text = text_payload(&"x".repeat(300));
    text.font_size = 96.0;
    assert_eq!(text_box(&text), (17280.0, 120.0));

    let r = SvgRasterizer::with_fontdb(usvg::fontdb::Database::new());
    let img = r.rasterize_text(&text).unwrap();
    assert!(img.width <= MAX_DIM && img.height <= MAX_DIM);
    assert!(img.scale < 1.0);
    let (w, h) = img.layer_size();
    assert!((w - 17280.0).abs() < 2.0, "layer width {w}");
    assert!((h - 120.0).abs() < 2.0, "layer height {h}");
}

#[test]
fn normal_rasters_keep_unit_scale() {
    let r = SvgRasterizer::with_fontdb(usvg::fontdb::Database::new());
    let img = r.rasterize_shape(&shape_payload(ShapeKind::Circle)).unwrap();
    assert_eq!(img.scale, 1.0);
    assert_eq!(img.layer_size(), (100.0, 100.0));
}
