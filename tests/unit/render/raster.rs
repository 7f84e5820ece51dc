use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let decoded = FloorImage::decode(&png_bytes(img)).unwrap();
    assert_eq!((decoded.width, decoded.height), (1, 1));
    assert_eq!(
        decoded.data,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_render_error() {
    let err = FloorImage::decode(b"definitely not a png").unwrap_err();
    assert!(matches!(err, OverlayError::Render(_)));
}

#[test]
fn solid_and_pixel_lookup() {
    let img = FloorImage::solid(3, 2, Rgba8::opaque(9, 8, 7));
    assert_eq!(img.data.len(), 24);
    assert_eq!(img.pixel(2, 1), Some([9, 8, 7, 255]));
    assert_eq!(img.pixel(3, 0), None);
    assert!(FloorImage::transparent(2, 2).data.iter().all(|&b| b == 0));
}

#[test]
fn save_png_round_trips_opaque_pixels() {
    let dir = std::env::temp_dir().join(format!(
        "floorplan_overlay_raster_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let path = dir.join("nested").join("out.png");

    let img = FloorImage::solid(4, 3, Rgba8::opaque(10, 200, 30));
    img.save_png(&path).unwrap();

    let back = FloorImage::decode(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(back, img);
    let _ = std::fs::remove_dir_all(&dir);
}
