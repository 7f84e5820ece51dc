//! Floor-plan marker overlay engine.
//!
//! Draws access-point installation markers onto raster floor plans: one image per floor, with
//! the marker shape chosen by mounting, rotated to the facing angle, colored through a palette
//! with duplicate-letter typo correction, and summarized in a color legend.
//!
//! # Pipeline overview
//!
//! 1. **Map**: real-world marker positions to image pixels ([`CoordinateMapper`]).
//! 2. **Resolve**: color requests to RGBA against an explicit [`Palette`] ([`ColorResolver`]).
//! 3. **Build**: per-mounting geometry plus direction arrows ([`ShapeBuilder`]).
//! 4. **Composite**: all shapes and labels onto one transparent [`Overlay`], each shape replacing
//!    the pixels it covers, then that overlay onto the background exactly once ([`composite`]).
//! 5. **Legend**: marker counts per resolved color ([`render_legend`]).
//!
//! [`render_project`] runs this for every floor of a [`FloorSource`], optionally in parallel,
//! and never lets one floor's failure abort the others.
//!
//! Pixels are premultiplied RGBA8 internally; PNG output is straight alpha.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod color;
mod foundation;
mod geometry;
mod model;
mod pipeline;
mod render;

pub use color::palette::{
    DEFAULT_MARKER_COLOR, Palette, PaletteEntry, collapse_repeats, parse_hex_rgb, parse_hex_rgba,
};
pub use color::resolve::{ColorMatch, ColorResolver, ResolvedColor};
pub use foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{OverlayError, OverlayResult};
pub use foundation::math::{normalize_degrees, scale_alpha};
pub use geometry::mapping::{CoordinateMapper, map_to_pixels};
pub use geometry::shape::{ARROW_STROKE_PX, MarkerShapes, ShapeBuilder, ShapeSpec, arrow_color};
pub use model::config::RenderConfig;
pub use model::floor::FloorPlan;
pub use model::marker::{AccessPointMarker, MarkerRecord, Mounting};
pub use pipeline::orchestrator::{RenderOpts, render_project};
pub use pipeline::output::{
    ArtifactNamer, FloorArtifact, RenderReport, SkippedFloor, sanitize_component,
};
pub use pipeline::scene::{FloorRender, FloorScene, LabelSpec, MarkerRenderer};
pub use pipeline::source::{FloorSource, Project, ProjectFloor, normalize_rel_path};
pub use render::composite::{
    BlitParams, PremulRgba8, blit_coverage, blit_over, copy_with_coverage, over, over_in_place,
};
pub use render::legend::{
    ColorTally, LEGEND_MARGIN_PX, LEGEND_MAX_ROWS, LegendEntry, LegendLayout, LegendRow,
    layout_legend, render_legend,
};
pub use render::overlay::{FillPath, Overlay, PlacedLabel, composite};
pub use render::raster::FloorImage;
pub use render::text::{TextAnchor, TextRaster, TextRasterizer, TextStyle};
