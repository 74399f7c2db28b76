use super::*;
use crate::{animation::track::TransformTrack, foundation::core::Point};

#[test]
fn render_clip_samples_in_local_time() {
    let mut clip = Clip::text("t", "hi").with_timing(2.0, 4.0);
    clip.transform.add_keyframe(AnimProperty::X, 2.0, 100.0).unwrap();
    clip.transform.add_keyframe(AnimProperty::Opacity, 4.0, 0.0).unwrap();

    let tr = render_clip(&clip, 3.0);
    assert!((tr.x - 50.0).abs() < 1e-9);
    assert!((tr.opacity - 0.75).abs() < 1e-9);
    assert_eq!(tr.scale, 1.0);
    assert_eq!(tr.rotation, 0.0);
}

#[test]
fn empty_curves_resolve_to_visible_identity() {
    let clip = Clip::text("t", "hi").with_transform(TransformTrack::default());
    assert_eq!(render_clip(&clip, 1.0), ClipTransform::default());
}

#[test]
fn authored_zero_opacity_stays_zero() {
    let clip =
        Clip::text("t", "hi").with_transform(TransformTrack::constant(0.0, 0.0, 1.0, 0.0, 0.0));
    let tr = render_clip(&clip, 1.0);
    assert_eq!(tr.opacity, 0.0);
    assert_eq!(tr.effective_opacity(), 0.0);
}

#[test]
fn get_matches_fields() {
    let tr = ClipTransform {
        x: 1.0,
        y: 2.0,
        scale: 3.0,
        rotation: 4.0,
        opacity: 5.0,
    };
    let got: Vec<f64> = AnimProperty::ALL.iter().map(|p| tr.get(*p)).collect();
    assert_eq!(got, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(tr.effective_opacity(), 1.0);
}

#[test]
fn affine_centres_layer_on_canvas_with_offset() {
    let canvas = Resolution::new(200, 100).unwrap();
    let tr = ClipTransform {
        x: 10.0,
        y: -5.0,
        ..ClipTransform::default()
    };
    let a = tr.to_affine(20.0, 10.0, canvas);
    let c = a * Point::new(10.0, 5.0);
    assert!((c.x - 110.0).abs() < 1e-9);
    assert!((c.y - 45.0).abs() < 1e-9);
    let tl = a * Point::new(0.0, 0.0);
    assert!((tl.x - 100.0).abs() < 1e-9);
    assert!((tl.y - 40.0).abs() < 1e-9);
}

#[test]
fn affine_scales_and_rotates_about_layer_centre() {
    let canvas = Resolution::new(100, 100).unwrap();
    let tr = ClipTransform {
        scale: 2.0,
        rotation: std::f64::consts::FRAC_PI_2,
        ..ClipTransform::default()
    };
    let a = tr.to_affine(10.0, 10.0, canvas);
    let centre = a * Point::new(5.0, 5.0);
    assert!((centre.x - 50.0).abs() < 1e-9);
    assert!((centre.y - 50.0).abs() < 1e-9);
    // Layer +x axis maps to canvas +y after a quarter turn.
    let right = a * Point::new(10.0, 5.0);
    assert!((right.x - 50.0).abs() < 1e-9);
    assert!((right.y - 60.0).abs() < 1e-9);
}
