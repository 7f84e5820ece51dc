use kurbo::Shape as _;

use crate::foundation::core::{Affine, BezPath, Rgba8};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::geometry::shape::ShapeSpec;
use crate::render::composite::{BlitParams, blit_coverage, blit_over, over_in_place};
use crate::render::raster::FloorImage;
use crate::render::text::TextRaster;

/// A path filled with one solid color.
#[derive(Clone, Debug, PartialEq)]
pub struct FillPath {
    /// Outline, filled non-zero.
    pub path: BezPath,
    /// Straight-alpha paint.
    pub color: Rgba8,
}

impl From<&ShapeSpec> for FillPath {
    fn from(shape: &ShapeSpec) -> Self {
        Self {
            path: shape.to_path(),
            color: shape.fill(),
        }
    }
}

/// Text raster placed at a pixel offset in the overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedLabel {
    /// Premultiplied text pixels.
    pub raster: TextRaster,
    /// Left edge, may be off-canvas.
    pub x: i64,
    /// Top edge, may be off-canvas.
    pub y: i64,
}

/// Transparent drawing layer the size of a floor image.
///
/// Each fill replaces the overlay pixels it covers instead of blending with earlier fills, so
/// where semi-transparent markers overlap the pixel carries one marker's opacity, not the sum.
/// The finished layer is composited onto the background once.
pub struct Overlay {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// Fill every path, in order, onto a fresh transparent layer. Later fills win where they
    /// overlap earlier ones.
    pub fn rasterize(width: u32, height: u32, fills: &[FillPath]) -> OverlayResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| OverlayError::render(format!("overlay width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| OverlayError::render(format!("overlay height {height} exceeds u16")))?;
        if w == 0 || h == 0 {
            return Err(OverlayError::render("overlay must be non-empty"));
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        clear_pixmap(&mut pixmap);

        let mut overlay = Self {
            width: w,
            height: h,
            pixmap,
        };
        for fill in fills {
            if fill.color.a == 0 {
                continue;
            }
            overlay.stamp(fill)?;
        }
        Ok(overlay)
    }

    fn stamp(&mut self, fill: &FillPath) -> OverlayResult<()> {
        let bounds = fill.path.bounding_box();
        if !bounds.is_finite() {
            return Ok(());
        }
        let x0 = bounds.x0.floor().max(0.0);
        let y0 = bounds.y0.floor().max(0.0);
        let x1 = bounds.x1.ceil().min(f64::from(self.width));
        let y1 = bounds.y1.ceil().min(f64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }
        // both extents are clipped to the u16 overlay size
        let (cw, ch) = ((x1 - x0) as u16, (y1 - y0) as u16);

        let local = Affine::translate((-x0, -y0)) * fill.path.clone();
        let mut mask = vello_cpu::Pixmap::new(cw, ch);
        clear_pixmap(&mut mask);
        let mut ctx = vello_cpu::RenderContext::new(cw, ch);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_path(&bezpath_to_cpu(&local));
        ctx.flush();
        ctx.render_to_pixmap(&mut mask);

        let params = BlitParams {
            dst_width: self.width(),
            dst_height: self.height(),
            src_width: u32::from(cw),
            src_height: u32::from(ch),
            x: x0 as i64,
            y: y0 as i64,
        };
        blit_coverage(
            self.pixmap.data_as_u8_slice_mut(),
            mask.data_as_u8_slice(),
            fill.color.to_premul(),
            params,
        )
    }

    /// Overlay width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Overlay height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Premultiplied overlay pixels.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Draw a text raster on top of the already-filled shapes.
    pub fn blit(&mut self, raster: &TextRaster, x: i64, y: i64) -> OverlayResult<()> {
        let params = BlitParams {
            dst_width: self.width(),
            dst_height: self.height(),
            src_width: raster.width,
            src_height: raster.height,
            x,
            y,
        };
        blit_over(self.pixmap.data_as_u8_slice_mut(), &raster.data, params)
    }

    /// Composite the layer over `base` and release it.
    pub fn composite_onto(self, base: &mut FloorImage) -> OverlayResult<()> {
        if base.width != self.width() || base.height != self.height() {
            return Err(OverlayError::render(format!(
                "overlay is {}x{} but floor image is {}x{}",
                self.width, self.height, base.width, base.height
            )));
        }
        over_in_place(&mut base.data, self.pixmap.data_as_u8_slice())
    }
}

/// Draw `shapes` and then `labels` onto `base` through one overlay layer.
///
/// An empty image, or nothing to draw, leaves `base` untouched.
pub fn composite(
    base: &mut FloorImage,
    shapes: &[ShapeSpec],
    labels: &[PlacedLabel],
) -> OverlayResult<()> {
    if base.width == 0 || base.height == 0 || (shapes.is_empty() && labels.is_empty()) {
        return Ok(());
    }

    let fills: Vec<FillPath> = shapes.iter().map(FillPath::from).collect();
    let mut overlay = Overlay::rasterize(base.width, base.height, &fills)?;
    for label in labels {
        overlay.blit(&label.raster, label.x, label.y)?;
    }
    overlay.composite_onto(base)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
