use super::*;

#[test]
fn normalize_degrees_wraps_both_directions() {
    assert_eq!(normalize_degrees(0.0), 0.0);
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert_eq!(normalize_degrees(720.0), 0.0);
    assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-12);
    assert!((normalize_degrees(450.0) - 90.0).abs() < 1e-12);
    assert_eq!(normalize_degrees(f64::NAN), 0.0);
}

#[test]
fn normalize_degrees_never_returns_360() {
    let r = normalize_degrees(-1e-17);
    assert!((0.0..360.0).contains(&r));
}

#[test]
fn unit_opacity_clamps_and_defaults() {
    assert_eq!(unit_opacity(-0.5), 0.0);
    assert_eq!(unit_opacity(1.5), 1.0);
    assert_eq!(unit_opacity(0.25), 0.25);
    assert_eq!(unit_opacity(f32::NAN), 1.0);
}

#[test]
fn scale_alpha_rounds() {
    assert_eq!(scale_alpha(255, 1.0), 255);
    assert_eq!(scale_alpha(255, 0.0), 0);
    assert_eq!(scale_alpha(255, 0.5), 128);
    assert_eq!(scale_alpha(160, 0.5), 80);
}

#[test]
fn mul_div255_identities() {
    assert_eq!(mul_div255(255, 255), 255);
    assert_eq!(mul_div255(0, 255), 0);
    assert_eq!(mul_div255(200, 255), 200);
}
