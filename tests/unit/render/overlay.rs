use super::*;
use crate::foundation::core::Point;

fn circle(x: f64, y: f64, r: f64, fill: Rgba8) -> ShapeSpec {
    ShapeSpec::Circle {
        center: Point::new(x, y),
        radius: r,
        fill,
    }
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 1)
}

#[test]
fn opaque_marker_replaces_center_pixel() {
    let mut img = FloorImage::solid(40, 40, Rgba8::opaque(255, 255, 255));
    composite(
        &mut img,
        &[circle(20.0, 20.0, 8.0, Rgba8::opaque(255, 0, 0))],
        &[],
    )
    .unwrap();

    let center = img.pixel(20, 20).unwrap();
    assert!(close(center, [255, 0, 0, 255]), "{center:?}");
    assert_eq!(img.pixel(2, 2), Some([255, 255, 255, 255]));
}

#[test]
fn fully_transparent_marker_leaves_image_unchanged() {
    let mut img = FloorImage::solid(16, 16, Rgba8::opaque(30, 60, 90));
    let before = img.clone();
    composite(
        &mut img,
        &[circle(8.0, 8.0, 6.0, Rgba8::new(255, 0, 0, 0))],
        &[],
    )
    .unwrap();
    assert_eq!(img, before);
}

#[test]
fn overlapping_translucent_markers_keep_single_opacity() {
    let fill = Rgba8::new(0, 0, 255, 128);
    let mut one = FloorImage::solid(60, 30, Rgba8::opaque(255, 255, 255));
    composite(&mut one, &[circle(20.0, 15.0, 10.0, fill)], &[]).unwrap();

    let mut two = FloorImage::solid(60, 30, Rgba8::opaque(255, 255, 255));
    composite(
        &mut two,
        &[circle(20.0, 15.0, 10.0, fill), circle(34.0, 15.0, 10.0, fill)],
        &[],
    )
    .unwrap();

    let single = one.pixel(14, 15).unwrap();
    let overlap = two.pixel(27, 15).unwrap();
    assert!(close(single, [127, 127, 255, 255]), "{single:?}");
    assert_eq!(overlap, single);
    assert_eq!(two.pixel(14, 15), Some(single));
}

#[test]
fn later_fill_replaces_earlier_one() {
    let overlay = Overlay::rasterize(
        20,
        20,
        &[
            FillPath::from(&circle(10.0, 10.0, 8.0, Rgba8::new(255, 0, 0, 200))),
            FillPath::from(&circle(10.0, 10.0, 4.0, Rgba8::new(0, 255, 0, 64))),
        ],
    )
    .unwrap();
    let i = (10 * 20 + 10) * 4;
    assert_eq!(&overlay.data()[i..i + 4], &Rgba8::new(0, 255, 0, 64).to_premul());
}

#[test]
fn fill_partly_off_canvas_is_clipped() {
    let mut img = FloorImage::solid(10, 10, Rgba8::opaque(255, 255, 255));
    composite(
        &mut img,
        &[circle(0.0, 0.0, 5.0, Rgba8::opaque(0, 0, 0))],
        &[],
    )
    .unwrap();
    assert_eq!(img.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(img.pixel(9, 9), Some([255, 255, 255, 255]));
}

#[test]
fn labels_draw_over_shapes() {
    let mut img = FloorImage::solid(10, 10, Rgba8::opaque(0, 0, 0));
    let label = PlacedLabel {
        raster: TextRaster {
            width: 2,
            height: 2,
            data: [0u8, 255, 0, 255].repeat(4),
            anchor: crate::render::text::TextAnchor::Start,
        },
        x: 4,
        y: 4,
    };
    composite(
        &mut img,
        &[circle(5.0, 5.0, 4.0, Rgba8::opaque(255, 0, 0))],
        &[label],
    )
    .unwrap();
    assert_eq!(img.pixel(4, 4), Some([0, 255, 0, 255]));
    assert_eq!(img.pixel(5, 5), Some([0, 255, 0, 255]));
}

#[test]
fn nothing_to_draw_is_noop() {
    let mut img = FloorImage::solid(4, 4, Rgba8::opaque(1, 2, 3));
    let before = img.clone();
    composite(&mut img, &[], &[]).unwrap();
    assert_eq!(img, before);
}

#[test]
fn oversized_overlay_is_render_error() {
    let err = Overlay::rasterize(70_000, 10, &[]).unwrap_err();
    assert!(matches!(err, OverlayError::Render(_)));
}

#[test]
fn composite_onto_checks_dimensions() {
    let overlay = Overlay::rasterize(4, 4, &[]).unwrap();
    let mut img = FloorImage::transparent(5, 4);
    assert!(overlay.composite_onto(&mut img).is_err());
}

#[test]
fn fill_path_from_shape_keeps_color() {
    let shape = circle(1.0, 1.0, 1.0, Rgba8::opaque(9, 9, 9));
    let fp = FillPath::from(&shape);
    assert_eq!(fp.color, Rgba8::opaque(9, 9, 9));
    assert!(!fp.path.elements().is_empty());
}
