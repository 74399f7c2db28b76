use super::*;

#[test]
fn resolution_serializes_as_pair() {
    let r = Resolution::new(1280, 720).unwrap();
    assert_eq!(serde_json::to_string(&r).unwrap(), "[1280,720]");
    let de: Resolution = serde_json::from_str("[640, 360]").unwrap();
    assert_eq!(de, Resolution::new(640, 360).unwrap());
}

#[test]
fn resolution_rejects_zero_dims() {
    assert!(Resolution::new(0, 10).is_err());
    assert!(Resolution::new(10, 0).is_err());
}

#[test]
fn resolution_center_and_len() {
    let r = Resolution::new(4, 2).unwrap();
    assert_eq!(r.center(), Vec2::new(2.0, 1.0));
    assert_eq!(r.rgba_len().unwrap(), 32);
}

#[test]
fn seconds_and_fps_checks() {
    assert!(check_seconds("t", 0.0).is_ok());
    assert!(check_seconds("t", -0.5).is_err());
    assert!(check_seconds("t", f64::NAN).is_err());
    assert!(check_fps(30.0).is_ok());
    assert!(check_fps(0.0).is_err());
    assert!(check_fps(f64::INFINITY).is_err());
}
