use crate::foundation::core::Point;
use crate::model::floor::FloorPlan;

/// Real-world → pixel scale for one floor plan.
///
/// Origin is the top-left corner on both sides. The mapper never clamps: off-plan positions map
/// to off-image pixels and are truncated later by the rasterizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    /// Pixels per real-world unit along x.
    pub scale_x: f64,
    /// Pixels per real-world unit along y.
    pub scale_y: f64,
}

impl CoordinateMapper {
    /// Derive the scale from a floor's pixel and real-world dimensions.
    ///
    /// A zero, negative or non-finite real dimension degrades that axis to scale 1.0 with a
    /// warning instead of failing.
    pub fn for_floor(floor: &FloorPlan) -> Self {
        Self {
            scale_x: axis_scale(&floor.id, "width", floor.pixel_width, floor.real_width),
            scale_y: axis_scale(&floor.id, "height", floor.pixel_height, floor.real_height),
        }
    }

    /// Map a real-world position to pixel coordinates.
    pub fn map(&self, x: f64, y: f64) -> Point {
        Point::new(x * self.scale_x, y * self.scale_y)
    }
}

fn axis_scale(floor_id: &str, axis: &str, pixels: u32, real: f64) -> f64 {
    if real.is_finite() && real > 0.0 {
        f64::from(pixels) / real
    } else {
        tracing::warn!(
            floor = floor_id,
            axis,
            real,
            "floor plan has no usable real-world size on this axis, using scale 1.0"
        );
        1.0
    }
}

/// One-shot form of [`CoordinateMapper::map`].
pub fn map_to_pixels(floor: &FloorPlan, x: f64, y: f64) -> Point {
    CoordinateMapper::for_floor(floor).map(x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mapping.rs"]
mod tests;
