use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Horizontal anchoring of a text raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// Left edge at the anchor.
    Start,
    /// Centered on the anchor.
    Middle,
}

/// Font size and colors for one piece of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f64,
    /// Glyph fill.
    pub fill: Rgba8,
    /// Outline drawn behind the glyphs to keep them readable on busy plans.
    pub halo: Option<Rgba8>,
}

/// Rasterized text, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRaster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied pixel bytes.
    pub data: Vec<u8>,
    /// How the raster was laid out relative to its anchor.
    pub anchor: TextAnchor,
}

impl TextRaster {
    /// Top-left placement for a raster anchored at `anchor_x`, with its top edge at `top_y`.
    pub fn origin_for(&self, anchor_x: f64, top_y: f64) -> (i64, i64) {
        let x = match self.anchor {
            TextAnchor::Start => anchor_x,
            TextAnchor::Middle => anchor_x - f64::from(self.width) / 2.0,
        };
        (x.round() as i64, top_y.round() as i64)
    }
}

const MAX_TEXT_PX: u32 = 4096;

/// Estimated advance width of `text` at `size_px`.
pub fn estimate_text_width(text: &str, size_px: f64) -> f64 {
    text.chars().count() as f64 * size_px * 0.62
}

/// Turns short strings into small rasters via SVG `<text>`.
///
/// Fonts come from the system font database. Without any usable font the rasters are simply
/// empty; drawing never fails because of missing fonts.
#[derive(Clone)]
pub struct TextRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl TextRasterizer {
    /// Load the system fonts.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts for labels");
        Self::with_fontdb(Arc::new(db))
    }

    /// Use an existing font database.
    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Rasterize a single line of text.
    pub fn rasterize(
        &self,
        text: &str,
        style: &TextStyle,
        anchor: TextAnchor,
    ) -> OverlayResult<TextRaster> {
        let size = style.size_px;
        if !size.is_finite() || size <= 0.0 {
            return Err(OverlayError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let pad = if style.halo.is_some() { 3.0 } else { 1.0 };
        let width = to_px(estimate_text_width(text, size) + pad * 2.0 + 2.0)?;
        let height = to_px(size * 1.4 + pad * 2.0)?;
        let baseline = pad + size * 1.05;

        let (x, anchor_attr) = match anchor {
            TextAnchor::Start => (pad, "start"),
            TextAnchor::Middle => (f64::from(width) / 2.0, "middle"),
        };

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><text x="{x}" y="{baseline}" font-family="sans-serif" font-size="{size}" text-anchor="{anchor_attr}" fill="{}" fill-opacity="{}""#,
            rgb_attr(style.fill),
            alpha_attr(style.fill),
        );
        if let Some(halo) = style.halo {
            svg.push_str(&format!(
                r#" stroke="{}" stroke-opacity="{}" stroke-width="3" stroke-linejoin="round" paint-order="stroke""#,
                rgb_attr(halo),
                alpha_attr(halo),
            ));
        }
        svg.push('>');
        svg.push_str(&escape_xml(text));
        svg.push_str("</text></svg>");

        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts)
            .map_err(|e| OverlayError::render(format!("parse label svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| OverlayError::render("failed to allocate text pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        Ok(TextRaster {
            width,
            height,
            data: pixmap.data().to_vec(),
            anchor,
        })
    }
}

fn to_px(v: f64) -> OverlayResult<u32> {
    let px = v.ceil().max(1.0);
    if px > f64::from(MAX_TEXT_PX) {
        return Err(OverlayError::render(format!(
            "text raster too large: {px} px (max {MAX_TEXT_PX})"
        )));
    }
    Ok(px as u32)
}

fn rgb_attr(c: Rgba8) -> String {
    format!("rgb({},{},{})", c.r, c.g, c.b)
}

fn alpha_attr(c: Rgba8) -> String {
    format!("{:.3}", f64::from(c.a) / 255.0)
}

/// Escape text for use as SVG character data.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
