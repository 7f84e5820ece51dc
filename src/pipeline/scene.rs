use crate::color::palette::Palette;
use crate::color::resolve::ColorResolver;
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::geometry::mapping::CoordinateMapper;
use crate::geometry::shape::{ShapeBuilder, ShapeSpec};
use crate::model::config::RenderConfig;
use crate::model::floor::FloorPlan;
use crate::model::marker::MarkerRecord;
use crate::render::legend::{ColorTally, render_legend};
use crate::render::overlay::{PlacedLabel, composite};
use crate::render::raster::FloorImage;
use crate::render::text::{TextAnchor, TextRasterizer, TextStyle};

const LABEL_FILL: Rgba8 = Rgba8::opaque(0, 0, 0);
const LABEL_HALO: Rgba8 = Rgba8::new(255, 255, 255, 220);
const LABEL_GAP_PX: f64 = 2.0;

/// Text queued for one marker, positioned relative to its center.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSpec {
    /// Label text.
    pub text: String,
    /// Horizontal center of the text.
    pub anchor_x: f64,
    /// Top edge of the text.
    pub top: f64,
}

/// Everything to draw for one floor, before rasterization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloorScene {
    /// Marker bodies and arrows, in draw order.
    pub shapes: Vec<ShapeSpec>,
    /// Marker labels.
    pub labels: Vec<LabelSpec>,
    /// Legend counts.
    pub tally: ColorTally,
    /// Markers that produced shapes.
    pub markers_drawn: usize,
    /// Markers dropped as invalid.
    pub markers_rejected: usize,
}

/// A rendered floor image plus its marker bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorRender {
    /// Background with markers, labels and legend composited.
    pub image: FloorImage,
    /// Markers that were drawn.
    pub markers_drawn: usize,
    /// Markers dropped as invalid.
    pub markers_rejected: usize,
    /// Legend counts.
    pub tally: ColorTally,
}

/// Turns one floor's marker records into a finished image.
///
/// Holds only shared references, so one renderer can serve every worker.
#[derive(Clone, Copy, Debug)]
pub struct MarkerRenderer<'a> {
    palette: &'a Palette,
    config: &'a RenderConfig,
    text: Option<&'a TextRasterizer>,
}

impl<'a> MarkerRenderer<'a> {
    /// Renderer over an explicit palette and config. `text` is needed for labels and legend text.
    pub fn new(
        palette: &'a Palette,
        config: &'a RenderConfig,
        text: Option<&'a TextRasterizer>,
    ) -> Self {
        Self {
            palette,
            config,
            text,
        }
    }

    /// Map, validate, resolve and build shapes for `markers` on a floor of the given pixel size.
    ///
    /// Invalid markers are logged and counted, never fatal. Positions further than one image
    /// size outside the plan are rejected as absurd.
    pub fn prepare(&self, floor: &FloorPlan, markers: &[MarkerRecord]) -> FloorScene {
        let mapper = CoordinateMapper::for_floor(floor);
        let resolver = ColorResolver::new(self.palette);
        let builder = ShapeBuilder::new(self.config.marker_radius_px, self.config.show_arrows);
        let (w, h) = (f64::from(floor.pixel_width), f64::from(floor.pixel_height));

        let mut scene = FloorScene::default();
        let mut arrows = Vec::new();
        for (idx, record) in markers.iter().enumerate() {
            let marker = match record.to_marker() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(floor = %floor.id, marker = idx, error = %e, "skipping marker");
                    scene.markers_rejected += 1;
                    continue;
                }
            };

            let center = mapper.map(marker.x, marker.y);
            if !within_reach(center, w, h) {
                tracing::warn!(
                    floor = %floor.id,
                    marker = idx,
                    x = center.x,
                    y = center.y,
                    "skipping marker far outside the floor plan"
                );
                scene.markers_rejected += 1;
                continue;
            }

            let color = resolver
                .resolve_detailed(&marker.color, self.config.effective_opacity(marker.opacity));
            scene.tally.record(&color);

            let shapes = builder.build(&marker, center, color.rgba);
            scene.shapes.push(shapes.body);
            arrows.extend(shapes.arrow);

            if self.config.show_labels
                && let Some(text) = marker.label
            {
                scene.labels.push(LabelSpec {
                    text,
                    anchor_x: center.x,
                    top: center.y + self.config.marker_radius_px + LABEL_GAP_PX,
                });
            }
            scene.markers_drawn += 1;
        }
        // arrows go above every body
        scene.shapes.extend(arrows);
        scene
    }

    /// Decode the floor background and draw every marker onto it.
    ///
    /// A missing or undecodable image, or a floor whose markers were all rejected, is an error
    /// for this floor only.
    #[tracing::instrument(skip_all, fields(floor = %floor.id, markers = markers.len()))]
    pub fn render_floor(
        &self,
        floor: &FloorPlan,
        markers: &[MarkerRecord],
    ) -> OverlayResult<FloorRender> {
        let bytes = floor
            .image
            .as_deref()
            .ok_or_else(|| OverlayError::data("floor image unavailable"))?;
        let mut image = FloorImage::decode(bytes)?;

        if floor.declared_size_differs(image.width, image.height) {
            tracing::warn!(
                declared_w = floor.pixel_width,
                declared_h = floor.pixel_height,
                decoded_w = image.width,
                decoded_h = image.height,
                "declared floor size differs from image, using image size"
            );
        }
        let sized = floor.sized_to(image.width, image.height);

        let scene = self.prepare(&sized, markers);
        if scene.markers_drawn == 0 && scene.markers_rejected > 0 {
            return Err(OverlayError::data(format!(
                "all {} markers were rejected",
                scene.markers_rejected
            )));
        }

        let labels = self.rasterize_labels(&scene.labels);
        composite(&mut image, &scene.shapes, &labels)?;

        if self.config.show_legend {
            render_legend(
                &mut image,
                &scene.tally,
                self.text,
                self.config.label_font_px,
            )?;
        }

        tracing::debug!(
            drawn = scene.markers_drawn,
            rejected = scene.markers_rejected,
            "rendered floor"
        );
        Ok(FloorRender {
            image,
            markers_drawn: scene.markers_drawn,
            markers_rejected: scene.markers_rejected,
            tally: scene.tally,
        })
    }

    /// Rasterize marker labels. A label that cannot be rasterized is dropped on its own.
    fn rasterize_labels(&self, labels: &[LabelSpec]) -> Vec<PlacedLabel> {
        let Some(text) = self.text else {
            return Vec::new();
        };
        let style = TextStyle {
            size_px: self.config.label_font_px,
            fill: LABEL_FILL,
            halo: Some(LABEL_HALO),
        };
        labels
            .iter()
            .filter_map(|l| match text.rasterize(&l.text, &style, TextAnchor::Middle) {
                Ok(raster) => {
                    let (x, y) = raster.origin_for(l.anchor_x, l.top);
                    Some(PlacedLabel { raster, x, y })
                }
                Err(e) => {
                    tracing::warn!(label = %l.text, error = %e, "dropping marker label");
                    None
                }
            })
            .collect()
    }
}

fn within_reach(p: Point, w: f64, h: f64) -> bool {
    p.x >= -w && p.x <= 2.0 * w && p.y >= -h && p.y <= 2.0 * h
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/scene.rs"]
mod tests;
