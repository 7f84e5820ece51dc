use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Point, Rect, Rgba8, Vec2};
use crate::foundation::math::normalize_degrees;
use crate::model::marker::{AccessPointMarker, Mounting};

/// Width of the facing-direction arrow shaft.
pub const ARROW_STROKE_PX: f64 = 2.0;

const CURVE_TOLERANCE: f64 = 0.1;

/// Geometry for one drawable element, in output pixel space.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeSpec {
    /// Ceiling marker.
    Circle {
        /// Center.
        center: Point,
        /// Radius in pixels.
        radius: f64,
        /// Fill color.
        fill: Rgba8,
    },
    /// Floor marker, axis-aligned.
    Square {
        /// Center.
        center: Point,
        /// Half of the side length.
        half_side: f64,
        /// Fill color.
        fill: Rgba8,
    },
    /// Wall marker: rectangle whose long axis points along the facing angle.
    ///
    /// `corners[0]` and `corners[1]` are the front edge (the end the marker faces).
    Rect {
        /// Corners in drawing order.
        corners: [Point; 4],
        /// Fill color.
        fill: Rgba8,
    },
    /// Facing-direction arrow.
    Arrow {
        /// Marker center.
        tail: Point,
        /// Arrow tip, two radii from the center.
        tip: Point,
        /// Shaft quad, [`ARROW_STROKE_PX`] wide.
        shaft: [Point; 4],
        /// Arrowhead triangle, `head[0]` is the tip.
        head: [Point; 3],
        /// Contrast color.
        color: Rgba8,
    },
}

impl ShapeSpec {
    /// Paint color of the shape.
    pub fn fill(&self) -> Rgba8 {
        match self {
            Self::Circle { fill, .. } | Self::Square { fill, .. } | Self::Rect { fill, .. } => {
                *fill
            }
            Self::Arrow { color, .. } => *color,
        }
    }

    /// Outline to fill with the non-zero rule.
    pub fn to_path(&self) -> BezPath {
        match self {
            Self::Circle { center, radius, .. } => {
                kurbo::Circle::new(*center, *radius).to_path(CURVE_TOLERANCE)
            }
            Self::Square {
                center, half_side, ..
            } => Rect::new(
                center.x - half_side,
                center.y - half_side,
                center.x + half_side,
                center.y + half_side,
            )
            .to_path(CURVE_TOLERANCE),
            Self::Rect { corners, .. } => polygon(corners),
            Self::Arrow { shaft, head, .. } => {
                let mut p = polygon(shaft);
                for el in polygon(head).elements() {
                    p.push(*el);
                }
                p
            }
        }
    }
}

fn polygon(points: &[Point]) -> BezPath {
    let mut p = BezPath::new();
    let mut it = points.iter();
    if let Some(first) = it.next() {
        p.move_to(*first);
        for pt in it {
            p.line_to(*pt);
        }
        p.close_path();
    }
    p
}

/// Body plus optional arrow for one marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerShapes {
    /// Orientation-specific marker body.
    pub body: ShapeSpec,
    /// Direction arrow, when requested and the facing angle is non-zero.
    pub arrow: Option<ShapeSpec>,
}

/// Builds marker geometry for a fixed radius and arrow setting.
#[derive(Clone, Copy, Debug)]
pub struct ShapeBuilder {
    /// Marker radius in pixels.
    pub radius_px: f64,
    /// Emit direction arrows.
    pub arrows: bool,
}

impl ShapeBuilder {
    /// Builder with the given radius and arrow setting.
    pub fn new(radius_px: f64, arrows: bool) -> Self {
        Self { radius_px, arrows }
    }

    /// Geometry for `marker` centered at the already-mapped pixel position `center`.
    pub fn build(&self, marker: &AccessPointMarker, center: Point, fill: Rgba8) -> MarkerShapes {
        let r = self.radius_px;
        let theta = normalize_degrees(marker.facing_deg);

        let body = match marker.mounting {
            Mounting::Ceiling => ShapeSpec::Circle {
                center,
                radius: r,
                fill,
            },
            Mounting::Floor => ShapeSpec::Square {
                center,
                half_side: r,
                fill,
            },
            Mounting::Wall => ShapeSpec::Rect {
                corners: wall_corners(center, r, theta),
                fill,
            },
        };

        // Exactly 0 means "no direction recorded".
        let arrow = (self.arrows && theta != 0.0)
            .then(|| arrow_shape(center, r, theta, arrow_color(fill)));

        MarkerShapes { body, arrow }
    }
}

/// Rotate an offset clockwise (in y-down image space) by `deg`.
pub fn rotate(offset: Vec2, deg: f64) -> Vec2 {
    let (sin, cos) = deg.to_radians().sin_cos();
    Vec2::new(
        offset.x * cos - offset.y * sin,
        offset.x * sin + offset.y * cos,
    )
}

fn wall_corners(center: Point, r: f64, theta: f64) -> [Point; 4] {
    let hw = r / 2.0;
    let hl = r;
    [
        Vec2::new(-hw, -hl),
        Vec2::new(hw, -hl),
        Vec2::new(hw, hl),
        Vec2::new(-hw, hl),
    ]
    .map(|o| center + rotate(o, theta))
}

fn arrow_shape(center: Point, r: f64, theta: f64, color: Rgba8) -> ShapeSpec {
    let dir = rotate(Vec2::new(0.0, -1.0), theta);
    let normal = rotate(Vec2::new(1.0, 0.0), theta);
    let length = 2.0 * r;
    let tip = center + dir * length;

    let head_len = (r * 0.5).max(6.0).min(length * 0.6);
    let head_half = head_len * 0.6;
    let base = tip - dir * head_len;
    let half = normal * (ARROW_STROKE_PX / 2.0);

    ShapeSpec::Arrow {
        tail: center,
        tip,
        shaft: [center - half, base - half, base + half, center + half],
        head: [tip, base + normal * head_half, base - normal * head_half],
        color,
    }
}

/// Arrow color chosen for contrast against the marker fill.
///
/// Highly transparent fills get strong red, light opaque fills dark gray, dark opaque fills
/// yellow. Arrows are always opaque.
pub fn arrow_color(fill: Rgba8) -> Rgba8 {
    const TRANSPARENT_BELOW: u8 = 128;
    const LIGHT_FROM: f64 = 0.6;

    if fill.a < TRANSPARENT_BELOW {
        Rgba8::opaque(230, 0, 0)
    } else if fill.luminance() >= LIGHT_FROM {
        Rgba8::opaque(64, 64, 64)
    } else {
        Rgba8::opaque(255, 221, 0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/shape.rs"]
mod tests;
