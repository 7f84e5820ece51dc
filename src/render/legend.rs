use std::collections::BTreeMap;

use kurbo::Shape as _;

use crate::color::resolve::ResolvedColor;
use crate::foundation::core::{Rect, Rgba8};
use crate::foundation::error::OverlayResult;
use crate::render::overlay::{FillPath, Overlay};
use crate::render::raster::FloorImage;
use crate::render::text::{TextAnchor, TextRasterizer, TextStyle, estimate_text_width};

/// Distance from the top-right corner of the image to the panel.
pub const LEGEND_MARGIN_PX: f64 = 16.0;
/// Rows shown before the list is truncated.
pub const LEGEND_MAX_ROWS: usize = 10;

const PADDING: f64 = 8.0;
const GAP: f64 = 6.0;
const CORNER_RADIUS: f64 = 6.0;
const PANEL_FILL: Rgba8 = Rgba8::new(255, 255, 255, 200);
const TEXT_FILL: Rgba8 = Rgba8::opaque(20, 20, 20);
const TITLE: &str = "Legend";

/// One legend line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    /// Resolved marker color.
    pub color: Rgba8,
    /// Display name of the first request that resolved to this color.
    pub label: String,
    /// Number of markers drawn in this color.
    pub count: usize,
}

/// Marker counts per resolved color.
///
/// Keyed by final RGBA, so requests that differ only in case or a corrected typo share an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorTally {
    entries: BTreeMap<Rgba8, (String, usize)>,
}

impl ColorTally {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one marker.
    pub fn record(&mut self, color: &ResolvedColor) {
        self.entries
            .entry(color.rgba)
            .or_insert_with(|| (color.label.clone(), 0))
            .1 += 1;
    }

    /// Markers counted for `color`.
    pub fn count(&self, color: Rgba8) -> usize {
        self.entries.get(&color).map_or(0, |(_, n)| *n)
    }

    /// Markers counted overall.
    pub fn total(&self) -> usize {
        self.entries.values().map(|(_, n)| n).sum()
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries by descending count, ties broken by RGBA.
    pub fn sorted(&self) -> Vec<LegendEntry> {
        let mut out: Vec<LegendEntry> = self
            .entries
            .iter()
            .map(|(color, (label, count))| LegendEntry {
                color: *color,
                label: label.clone(),
                count: *count,
            })
            .collect();
        out.sort_by(|a, b| b.count.cmp(&a.count).then(a.color.cmp(&b.color)));
        out
    }
}

/// A positioned legend line. The overflow line has no swatch.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendRow {
    /// Color square, if any.
    pub swatch: Option<(Rect, Rgba8)>,
    /// Line text.
    pub text: String,
    /// Left edge of the text.
    pub text_x: f64,
    /// Top of the row.
    pub top: f64,
}

/// Panel geometry for a legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendLayout {
    /// Panel bounds.
    pub panel: Rect,
    /// Height of every row, title included.
    pub row_height: f64,
    /// Title row.
    pub title: LegendRow,
    /// Entry rows, overflow last.
    pub rows: Vec<LegendRow>,
}

/// Place the legend for `entries` in an image `image_width` pixels wide.
pub fn layout_legend(entries: &[LegendEntry], image_width: u32, font_px: f64) -> LegendLayout {
    let shown = if entries.len() > LEGEND_MAX_ROWS {
        LEGEND_MAX_ROWS - 1
    } else {
        entries.len()
    };
    let overflow = entries.len() - shown;

    let row_height = (font_px * 1.5).ceil();
    let swatch = font_px.ceil();

    let mut texts: Vec<(Option<Rgba8>, String)> = entries[..shown]
        .iter()
        .map(|e| (Some(e.color), format!("{} ({})", e.label, e.count)))
        .collect();
    if overflow > 0 {
        texts.push((None, format!("+{overflow} more")));
    }

    let widest_row = texts
        .iter()
        .map(|(_, t)| swatch + GAP + estimate_text_width(t, font_px))
        .fold(0.0, f64::max);
    let width = (PADDING * 2.0 + widest_row.max(estimate_text_width(TITLE, font_px))).ceil();
    let height = PADDING * 2.0 + row_height * (texts.len() + 1) as f64;

    let x0 = (f64::from(image_width) - LEGEND_MARGIN_PX - width).max(0.0);
    let y0 = LEGEND_MARGIN_PX;
    let panel = Rect::new(x0, y0, x0 + width, y0 + height);

    let title = LegendRow {
        swatch: None,
        text: TITLE.to_owned(),
        text_x: x0 + PADDING,
        top: y0 + PADDING,
    };

    let rows = texts
        .into_iter()
        .enumerate()
        .map(|(i, (color, text))| {
            let top = y0 + PADDING + row_height * (i + 1) as f64;
            let sy = top + (row_height - swatch) / 2.0;
            let sx = x0 + PADDING;
            LegendRow {
                swatch: color.map(|c| (Rect::new(sx, sy, sx + swatch, sy + swatch), c)),
                text,
                text_x: sx + swatch + GAP,
                top,
            }
        })
        .collect();

    LegendLayout {
        panel,
        row_height,
        title,
        rows,
    }
}

/// Draw the legend panel for `tally` onto `image`.
///
/// Does nothing for an empty tally or an empty image. Without a rasterizer only the panel and
/// swatches are drawn.
pub fn render_legend(
    image: &mut FloorImage,
    tally: &ColorTally,
    text: Option<&TextRasterizer>,
    font_px: f64,
) -> OverlayResult<()> {
    if tally.is_empty() || image.width == 0 || image.height == 0 {
        return Ok(());
    }

    let layout = layout_legend(&tally.sorted(), image.width, font_px);

    let mut fills = vec![FillPath {
        path: kurbo::RoundedRect::from_rect(layout.panel, CORNER_RADIUS).to_path(0.1),
        color: PANEL_FILL,
    }];
    fills.extend(layout.rows.iter().filter_map(|row| {
        row.swatch.map(|(rect, color)| FillPath {
            path: rect.to_path(0.1),
            color,
        })
    }));

    let mut overlay = Overlay::rasterize(image.width, image.height, &fills)?;

    if let Some(text) = text {
        let style = TextStyle {
            size_px: font_px,
            fill: TEXT_FILL,
            halo: None,
        };
        for row in std::iter::once(&layout.title).chain(layout.rows.iter()) {
            let raster = match text.rasterize(&row.text, &style, TextAnchor::Start) {
                Ok(raster) => raster,
                Err(e) => {
                    tracing::warn!(text = %row.text, error = %e, "dropping legend text");
                    continue;
                }
            };
            let top = row.top + (layout.row_height - f64::from(raster.height)) / 2.0;
            let (x, y) = raster.origin_for(row.text_x, top);
            overlay.blit(&raster, x, y)?;
        }
    }

    tracing::debug!(
        colors = tally.len(),
        markers = tally.total(),
        "drew legend"
    );
    overlay.composite_onto(image)
}

#[cfg(test)]
#[path = "../../tests/unit/render/legend.rs"]
mod tests;
