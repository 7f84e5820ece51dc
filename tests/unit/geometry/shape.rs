use super::*;

fn marker(mounting: Mounting, facing_deg: f64) -> AccessPointMarker {
    AccessPointMarker {
        x: 0.0,
        y: 0.0,
        mounting,
        facing_deg,
        tilt_deg: 0.0,
        color: "Yellow".to_string(),
        opacity: 1.0,
        label: None,
    }
}

const YELLOW: Rgba8 = Rgba8::opaque(255, 255, 0);

fn corners(shapes: &MarkerShapes) -> [Point; 4] {
    match &shapes.body {
        ShapeSpec::Rect { corners, .. } => *corners,
        other => panic!("expected wall rect, got {other:?}"),
    }
}

/// Angle of the front edge's midpoint, clockwise from "up".
fn long_axis_deg(c: [Point; 4], center: Point) -> f64 {
    let front = c[0].midpoint(c[1]);
    let v = front - center;
    normalize_degrees(v.x.atan2(-v.y).to_degrees())
}

#[test]
fn ceiling_is_circle_and_floor_is_square() {
    let b = ShapeBuilder::new(10.0, false);
    let c = Point::new(50.0, 40.0);

    let s = b.build(&marker(Mounting::Ceiling, 0.0), c, YELLOW);
    assert_eq!(
        s.body,
        ShapeSpec::Circle {
            center: c,
            radius: 10.0,
            fill: YELLOW
        }
    );

    let s = b.build(&marker(Mounting::Floor, 45.0), c, YELLOW);
    assert_eq!(
        s.body,
        ShapeSpec::Square {
            center: c,
            half_side: 10.0,
            fill: YELLOW
        }
    );
    let bbox = kurbo::Shape::bounding_box(&s.body.to_path());
    assert!((bbox.width() - 20.0).abs() < 1e-9);
    assert!((bbox.height() - 20.0).abs() < 1e-9);
}

#[test]
fn wall_at_zero_and_360_is_identical() {
    let b = ShapeBuilder::new(12.0, false);
    let c = Point::new(100.0, 100.0);
    let a = corners(&b.build(&marker(Mounting::Wall, 0.0), c, YELLOW));
    let z = corners(&b.build(&marker(Mounting::Wall, 360.0), c, YELLOW));
    for (p, q) in a.iter().zip(z.iter()) {
        assert!((p.x - q.x).abs() < 1e-9 && (p.y - q.y).abs() < 1e-9);
    }
}

#[test]
fn wall_long_axis_follows_facing_angle() {
    let b = ShapeBuilder::new(12.0, false);
    let c = Point::new(100.0, 100.0);
    for deg in [0.0, 30.0, 90.0, 135.0, 180.0, 271.5, 359.0] {
        let k = corners(&b.build(&marker(Mounting::Wall, deg), c, YELLOW));
        let got = long_axis_deg(k, c);
        let diff = (got - deg).abs().min(360.0 - (got - deg).abs());
        assert!(diff < 1e-9, "facing {deg} gave {got}");
    }
}

#[test]
fn wall_facing_90_is_horizontal() {
    let b = ShapeBuilder::new(12.0, false);
    let c = Point::new(100.0, 100.0);
    let k = corners(&b.build(&marker(Mounting::Wall, 90.0), c, YELLOW));
    let bbox = kurbo::Shape::bounding_box(&polygon(&k));
    assert!((bbox.width() - 24.0).abs() < 1e-9);
    assert!((bbox.height() - 12.0).abs() < 1e-9);
    let front = k[0].midpoint(k[1]);
    assert!((front.y - c.y).abs() < 1e-9);
    assert!(front.x > c.x);
}

#[test]
fn wall_rect_has_expected_side_lengths() {
    let b = ShapeBuilder::new(10.0, false);
    let k = corners(&b.build(&marker(Mounting::Wall, 33.0), Point::ORIGIN, YELLOW));
    assert!((k[0].distance(k[1]) - 10.0).abs() < 1e-9);
    assert!((k[1].distance(k[2]) - 20.0).abs() < 1e-9);
}

#[test]
fn zero_facing_suppresses_arrow() {
    let b = ShapeBuilder::new(10.0, true);
    let s = b.build(&marker(Mounting::Wall, 0.0), Point::ORIGIN, YELLOW);
    assert!(s.arrow.is_none());
    let s = b.build(&marker(Mounting::Ceiling, 360.0), Point::ORIGIN, YELLOW);
    assert!(s.arrow.is_none());
}

#[test]
fn nonzero_facing_produces_one_arrow() {
    let b = ShapeBuilder::new(10.0, true);
    for deg in [0.5, 90.0, 180.0, 359.9] {
        let s = b.build(&marker(Mounting::Ceiling, deg), Point::ORIGIN, YELLOW);
        let Some(ShapeSpec::Arrow { tail, tip, .. }) = s.arrow else {
            panic!("missing arrow at {deg}");
        };
        assert!((tail.distance(tip) - 20.0).abs() < 1e-9);
    }

    let off = ShapeBuilder::new(10.0, false);
    assert!(
        off.build(&marker(Mounting::Ceiling, 90.0), Point::ORIGIN, YELLOW)
            .arrow
            .is_none()
    );
}

#[test]
fn arrow_points_along_facing() {
    let b = ShapeBuilder::new(10.0, true);
    let c = Point::new(50.0, 50.0);
    let s = b.build(&marker(Mounting::Wall, 90.0), c, YELLOW);
    let Some(ShapeSpec::Arrow { tip, shaft, .. }) = s.arrow else {
        panic!("missing arrow");
    };
    assert!((tip.x - 70.0).abs() < 1e-9 && (tip.y - 50.0).abs() < 1e-9);
    assert!((shaft[0].distance(shaft[3]) - ARROW_STROKE_PX).abs() < 1e-9);
}

#[test]
fn arrow_color_contrasts_with_fill() {
    assert_eq!(
        arrow_color(Rgba8::new(255, 204, 204, 100)),
        Rgba8::opaque(230, 0, 0)
    );
    assert_eq!(arrow_color(Rgba8::opaque(255, 255, 0)), Rgba8::opaque(64, 64, 64));
    assert_eq!(arrow_color(Rgba8::opaque(0, 0, 128)), Rgba8::opaque(255, 221, 0));
    // translucency wins over lightness
    assert_eq!(arrow_color(Rgba8::new(0, 0, 0, 10)), Rgba8::opaque(230, 0, 0));
}

#[test]
fn arrow_path_has_two_subpaths() {
    let b = ShapeBuilder::new(10.0, true);
    let s = b.build(&marker(Mounting::Ceiling, 45.0), Point::ORIGIN, YELLOW);
    let path = s.arrow.unwrap().to_path();
    let moves = path
        .elements()
        .iter()
        .filter(|e| matches!(e, kurbo::PathEl::MoveTo(_)))
        .count();
    assert_eq!(moves, 2);
}
