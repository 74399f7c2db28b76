use super::*;

#[test]
fn identity_track_has_one_key_per_property() {
    let t = TransformTrack::identity();
    for prop in AnimProperty::ALL {
        assert_eq!(t.curve(prop).len(), 1);
        assert_eq!(t.curve(prop)[0].time, 0.0);
    }
    assert_eq!(t.sample(AnimProperty::Scale, 3.0), 1.0);
    assert_eq!(t.sample(AnimProperty::Opacity, 3.0), 1.0);
    assert_eq!(t.sample(AnimProperty::X, 3.0), 0.0);
}

#[test]
fn empty_curves_use_visibility_preserving_defaults() {
    let t = TransformTrack::default();
    assert_eq!(t.sample(AnimProperty::X, 1.0), 0.0);
    assert_eq!(t.sample(AnimProperty::Y, 1.0), 0.0);
    assert_eq!(t.sample(AnimProperty::Rotation, 1.0), 0.0);
    assert_eq!(t.sample(AnimProperty::Scale, 1.0), 1.0);
    assert_eq!(t.sample(AnimProperty::Opacity, 1.0), 1.0);
}

#[test]
fn add_and_remove_keyframes() {
    let mut t = TransformTrack::identity();
    let idx = t.add_keyframe(AnimProperty::X, 2.0, 100.0).unwrap();
    assert_eq!(idx, 1);
    assert!((t.sample(AnimProperty::X, 1.0) - 50.0).abs() < 1e-9);

    let removed = t.remove_keyframe(AnimProperty::X, 1).unwrap();
    assert_eq!(removed.value, 100.0);
    assert!(t.remove_keyframe(AnimProperty::X, 5).is_none());
    assert_eq!(t.sample(AnimProperty::X, 1.0), 0.0);
}

#[test]
fn add_keyframe_rejects_non_finite() {
    let mut t = TransformTrack::identity();
    assert!(t.add_keyframe(AnimProperty::Opacity, 1.0, f64::NAN).is_err());
    assert_eq!(t.opacity.len(), 1);
}

#[test]
fn set_curve_sorts_samples() {
    let mut t = TransformTrack::default();
    t.set_curve(
        AnimProperty::Rotation,
        vec![
            Keyframe {
                time: 2.0,
                value: 1.0,
            },
            Keyframe {
                time: 0.0,
                value: 0.0,
            },
        ],
    )
    .unwrap();
    assert_eq!(t.rotation[0].time, 0.0);
    assert_eq!(t.rotation[1].time, 2.0);
}

#[test]
fn property_names_roundtrip() {
    for prop in AnimProperty::ALL {
        assert_eq!(prop.as_str().parse::<AnimProperty>().unwrap(), prop);
    }
    assert!("skew".parse::<AnimProperty>().is_err());
    assert_eq!(
        serde_json::to_string(&AnimProperty::Rotation).unwrap(),
        "\"rotation\""
    );
}

#[test]
fn missing_curves_deserialize_as_empty() {
    let t: TransformTrack = serde_json::from_str(r#"{"x":[{"time":0,"value":5}]}"#).unwrap();
    assert_eq!(t.x.len(), 1);
    assert!(t.opacity.is_empty());
    assert_eq!(t.sample(AnimProperty::Opacity, 0.0), 1.0);
}
