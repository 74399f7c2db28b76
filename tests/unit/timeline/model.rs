use super::*;
use crate::animation::track::AnimProperty;

#[test]
fn new_clips_get_editor_defaults() {
    let c = Clip::text("t1", "Hello");
    assert_eq!(c.start, 0.0);
    assert_eq!(c.duration, DEFAULT_CLIP_DURATION);
    assert_eq!(c.kind(), ClipKind::Text);
    assert!(c.effects.is_empty());
    for prop in AnimProperty::ALL {
        assert_eq!(c.transform.curve(prop).len(), 1);
    }
    let ClipPayload::Text(t) = &c.payload else {
        panic!("expected text payload");
    };
    assert_eq!(t.font, "Arial");
    assert_eq!(t.font_size, 48.0);
    assert_eq!(t.color, "#ffffff");

    let s = Clip::shape("s1", ShapeKind::Rectangle);
    let ClipPayload::Shape(p) = &s.payload else {
        panic!("expected shape payload");
    };
    assert_eq!(p.fill_color, "#14b8a6");
    assert_eq!(p.stroke_width, 2.0);
}

#[test]
fn active_interval_is_closed_on_both_ends() {
    let c = Clip::video("v", "a.mp4").with_timing(2.0, 3.0);
    assert!(c.is_active_at(2.0));
    assert!(c.is_active_at(5.0));
    assert!(!c.is_active_at(1.999));
    assert!(!c.is_active_at(5.001));
}

#[test]
fn json_uses_flat_camel_case_payload() {
    let c = Clip::image("img", "photo.png").with_timing(1.0, 2.0);
    let v = serde_json::to_value(&c).unwrap();
    assert_eq!(v["type"], "image");
    assert_eq!(v["mediaUrl"], "photo.png");
    assert_eq!(v["start"], 1.0);
    assert!(v["transform"]["opacity"].is_array());
}

#[test]
fn parses_editor_shaped_json_with_defaults() {
    let s = r##"{
        "id": "clip-1",
        "start": 0,
        "duration": 5,
        "type": "shape",
        "shapeType": "circle",
        "fillColor": "#ff0000",
        "transform": { "x": [{ "time": 0, "value": 10 }] },
        "effects": [{ "name": "blur", "params": { "radius": 3 } }]
    }"##;
    let c: Clip = serde_json::from_str(s).unwrap();
    let ClipPayload::Shape(p) = &c.payload else {
        panic!("expected shape payload");
    };
    assert_eq!(p.shape_type, ShapeKind::Circle);
    assert_eq!(p.fill_color, "#ff0000");
    assert_eq!(p.stroke_color, "#ffffff");
    assert_eq!(c.effects[0].param("radius"), Some(3.0));
    assert!(c.transform.y.is_empty());
}

#[test]
fn validate_rejects_bad_timing() {
    assert!(Clip::text("a", "x").with_timing(-1.0, 1.0).validate().is_err());
    assert!(Clip::text("a", "x").with_timing(0.0, 0.0).validate().is_err());
    assert!(Clip::text("a", "x").with_timing(0.0, f64::NAN).validate().is_err());
    assert!(Clip::text("", "x").validate().is_err());
    assert!(Clip::text("a", "x").validate().is_ok());
}

#[test]
fn effect_instance_builder() {
    let e = EffectInstance::new("color")
        .with_param("brightness", 1.5)
        .with_param("contrast", 0.8);
    assert_eq!(e.param("brightness"), Some(1.5));
    assert_eq!(e.param("saturation"), None);
}
