use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::normalize_degrees;

/// How an access point is installed; selects the marker shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mounting {
    /// Ceiling mount, drawn as a circle.
    Ceiling,
    /// Wall mount, drawn as a rectangle rotated to the facing angle.
    Wall,
    /// Floor mount, drawn as an axis-aligned square.
    Floor,
}

impl FromStr for Mounting {
    type Err = OverlayError;

    fn from_str(s: &str) -> OverlayResult<Self> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("ceiling") {
            Ok(Self::Ceiling)
        } else if t.eq_ignore_ascii_case("wall") {
            Ok(Self::Wall)
        } else if t.eq_ignore_ascii_case("floor") {
            Ok(Self::Floor)
        } else {
            Err(OverlayError::data(format!("unknown mounting \"{s}\"")))
        }
    }
}

/// A validated access-point marker, immutable for one render call.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessPointMarker {
    /// Real-world x position (same unit as the floor's real width).
    pub x: f64,
    /// Real-world y position, growing downwards like image rows.
    pub y: f64,
    /// Installation category.
    pub mounting: Mounting,
    /// Facing angle in degrees, clockwise from "up", in `[0, 360)`.
    pub facing_deg: f64,
    /// Downward tilt in degrees. Not used for drawing.
    pub tilt_deg: f64,
    /// Requested color: a palette name or `#RRGGBB`.
    pub color: String,
    /// Marker opacity in `[0, 1]`.
    pub opacity: f32,
    /// Optional text drawn under the marker.
    pub label: Option<String>,
}

fn one() -> f32 {
    1.0
}

/// Marker as produced by the upstream processing layer, before validation.
///
/// `mounting` is free-form text upstream; [`MarkerRecord::to_marker`] turns it into a
/// [`Mounting`] and rejects anything it does not recognise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    /// Real-world x position.
    pub x: f64,
    /// Real-world y position.
    pub y: f64,
    /// Mounting string, e.g. `"CEILING"`.
    pub mounting: String,
    /// Facing angle in degrees.
    #[serde(default)]
    pub facing_deg: f64,
    /// Tilt in degrees.
    #[serde(default)]
    pub tilt_deg: f64,
    /// Requested color.
    #[serde(default)]
    pub color: String,
    /// Opacity in `[0, 1]`.
    #[serde(default = "one")]
    pub opacity: f32,
    /// Optional label.
    #[serde(default)]
    pub label: Option<String>,
}

impl MarkerRecord {
    /// Validate into an [`AccessPointMarker`].
    ///
    /// Non-finite coordinates or facing angles and unknown mountings are data errors.
    /// Opacity is clamped into `[0, 1]`; a non-finite opacity becomes `1.0`.
    pub fn to_marker(&self) -> OverlayResult<AccessPointMarker> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(OverlayError::data(format!(
                "marker position ({}, {}) is not finite",
                self.x, self.y
            )));
        }
        if !self.facing_deg.is_finite() {
            return Err(OverlayError::data("marker facing angle is not finite"));
        }
        let mounting = self.mounting.parse::<Mounting>()?;

        let opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            tracing::warn!(opacity = %self.opacity, "non-finite marker opacity, using 1.0");
            1.0
        };

        let label = self
            .label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        Ok(AccessPointMarker {
            x: self.x,
            y: self.y,
            mounting,
            facing_deg: normalize_degrees(self.facing_deg),
            tilt_deg: if self.tilt_deg.is_finite() {
                self.tilt_deg
            } else {
                0.0
            },
            color: self.color.clone(),
            opacity,
            label,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/marker.rs"]
mod tests;
