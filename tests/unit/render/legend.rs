use super::*;
use crate::color::resolve::ColorMatch;

fn resolved(rgba: Rgba8, label: &str) -> ResolvedColor {
    ResolvedColor {
        rgba,
        matched: ColorMatch::Exact,
        label: label.to_owned(),
    }
}

fn entry(i: u8, count: usize) -> LegendEntry {
    LegendEntry {
        color: Rgba8::opaque(i, 0, 0),
        label: format!("c{i}"),
        count,
    }
}

#[test]
fn tally_merges_same_rgba_and_keeps_first_label() {
    let yellow = Rgba8::opaque(255, 255, 0);
    let mut t = ColorTally::new();
    t.record(&resolved(yellow, "Yellow"));
    t.record(&resolved(yellow, "#FFFF00"));
    t.record(&resolved(Rgba8::opaque(0, 0, 255), "Blue"));

    assert_eq!(t.count(yellow), 2);
    assert_eq!(t.total(), 3);
    assert_eq!(t.len(), 2);
    let sorted = t.sorted();
    assert_eq!(sorted[0].label, "Yellow");
    assert_eq!(sorted[0].count, 2);
}

#[test]
fn sorted_breaks_ties_by_rgba() {
    let mut t = ColorTally::new();
    t.record(&resolved(Rgba8::opaque(9, 0, 0), "b"));
    t.record(&resolved(Rgba8::opaque(1, 0, 0), "a"));
    let sorted = t.sorted();
    assert_eq!(sorted[0].color, Rgba8::opaque(1, 0, 0));
    assert_eq!(sorted[1].color, Rgba8::opaque(9, 0, 0));
}

#[test]
fn layout_anchors_top_right() {
    let layout = layout_legend(&[entry(1, 3)], 800, 12.0);
    assert_eq!(layout.panel.x1, 800.0 - LEGEND_MARGIN_PX);
    assert_eq!(layout.panel.y0, LEGEND_MARGIN_PX);
    assert_eq!(layout.rows.len(), 1);
    assert_eq!(layout.rows[0].text, "c1 (3)");
    assert!(layout.rows[0].swatch.is_some());
}

#[test]
fn layout_truncates_with_overflow_row() {
    let entries: Vec<_> = (0..12).map(|i| entry(i, 20 - i as usize)).collect();
    let layout = layout_legend(&entries, 1000, 12.0);
    assert_eq!(layout.rows.len(), LEGEND_MAX_ROWS);
    let last = layout.rows.last().unwrap();
    assert_eq!(last.text, "+3 more");
    assert!(last.swatch.is_none());

    let exact: Vec<_> = (0..10).map(|i| entry(i, 1)).collect();
    let layout = layout_legend(&exact, 1000, 12.0);
    assert_eq!(layout.rows.len(), 10);
    assert!(layout.rows.iter().all(|r| r.swatch.is_some()));
}

#[test]
fn empty_tally_is_noop() {
    let mut img = FloorImage::solid(100, 100, Rgba8::opaque(0, 0, 0));
    let before = img.clone();
    render_legend(&mut img, &ColorTally::new(), None, 12.0).unwrap();
    assert_eq!(img, before);
}

#[test]
fn legend_panel_is_drawn_in_corner() {
    let mut img = FloorImage::solid(200, 120, Rgba8::opaque(0, 0, 0));
    let mut t = ColorTally::new();
    t.record(&resolved(Rgba8::opaque(255, 0, 0), "Red"));
    render_legend(&mut img, &t, None, 12.0).unwrap();

    let layout = layout_legend(&t.sorted(), 200, 12.0);
    let swatch = layout.rows[0].swatch.unwrap().0.center();
    let px = img.pixel(swatch.x as u32, swatch.y as u32).unwrap();
    assert!(px[0] >= 254 && px[1] <= 1 && px[3] == 255, "{px:?}");

    // panel interior next to the title is lightened
    let px = img.pixel(170, 30).unwrap();
    assert!(px[0] > 150, "{px:?}");
    assert_eq!(img.pixel(2, 2), Some([0, 0, 0, 255]));
}

#[test]
fn oversized_legend_text_is_dropped() {
    let mut img = FloorImage::solid(200, 120, Rgba8::opaque(0, 0, 0));
    let mut t = ColorTally::new();
    t.record(&resolved(Rgba8::opaque(255, 0, 0), "Red"));
    let fonts = TextRasterizer::with_fontdb(std::sync::Arc::new(usvg::fontdb::Database::new()));

    // "Red (1)" at 1000 px is wider than any text raster may be
    render_legend(&mut img, &t, Some(&fonts), 1000.0).unwrap();
    assert_ne!(img.pixel(100, 60), Some([0, 0, 0, 255]));
}
