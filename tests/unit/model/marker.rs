use super::*;
use serde_json::json;

fn record(mounting: &str) -> MarkerRecord {
    MarkerRecord {
        x: 1.0,
        y: 2.0,
        mounting: mounting.to_string(),
        facing_deg: 0.0,
        tilt_deg: 0.0,
        color: "Yellow".to_string(),
        opacity: 1.0,
        label: None,
    }
}

#[test]
fn mounting_parses_case_insensitively() {
    assert_eq!("CEILING".parse::<Mounting>().unwrap(), Mounting::Ceiling);
    assert_eq!(" wall ".parse::<Mounting>().unwrap(), Mounting::Wall);
    assert_eq!("Floor".parse::<Mounting>().unwrap(), Mounting::Floor);
}

#[test]
fn unknown_mounting_is_a_data_error() {
    let err = record("pole").to_marker().unwrap_err();
    assert!(matches!(err, OverlayError::Data(_)));
    assert!(err.to_string().contains("pole"));
}

#[test]
fn non_finite_position_is_rejected() {
    let mut r = record("ceiling");
    r.x = f64::NAN;
    assert!(matches!(r.to_marker(), Err(OverlayError::Data(_))));

    let mut r = record("ceiling");
    r.y = f64::INFINITY;
    assert!(matches!(r.to_marker(), Err(OverlayError::Data(_))));
}

#[test]
fn facing_angle_wraps_and_opacity_clamps() {
    let mut r = record("wall");
    r.facing_deg = 450.0;
    r.opacity = 3.0;
    let m = r.to_marker().unwrap();
    assert!((m.facing_deg - 90.0).abs() < 1e-12);
    assert_eq!(m.opacity, 1.0);

    r.facing_deg = -90.0;
    r.opacity = f32::NAN;
    let m = r.to_marker().unwrap();
    assert!((m.facing_deg - 270.0).abs() < 1e-12);
    assert_eq!(m.opacity, 1.0);
}

#[test]
fn blank_labels_are_dropped() {
    let mut r = record("floor");
    r.label = Some("   ".to_string());
    assert_eq!(r.to_marker().unwrap().label, None);

    r.label = Some(" AP-7 ".to_string());
    assert_eq!(r.to_marker().unwrap().label.as_deref(), Some("AP-7"));
}

#[test]
fn record_deserializes_with_defaults() {
    let r: MarkerRecord = serde_json::from_value(json!({
        "x": 3.5,
        "y": 4.0,
        "mounting": "CEILING"
    }))
    .unwrap();
    assert_eq!(r.opacity, 1.0);
    assert_eq!(r.facing_deg, 0.0);
    assert_eq!(r.color, "");
    assert_eq!(r.label, None);
}
