use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};

/// Drawing options for one render invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Marker radius in output pixels.
    pub marker_radius_px: f64,
    /// Draw marker labels.
    pub show_labels: bool,
    /// Draw facing-direction arrows.
    pub show_arrows: bool,
    /// When set, replaces every marker's own opacity.
    pub opacity_override: Option<f32>,
    /// Draw the color legend.
    pub show_legend: bool,
    /// Font size for labels and legend text.
    pub label_font_px: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            marker_radius_px: 12.0,
            show_labels: true,
            show_arrows: true,
            opacity_override: None,
            show_legend: true,
            label_font_px: 12.0,
        }
    }
}

impl RenderConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> OverlayResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot draw with.
    pub fn validate(&self) -> OverlayResult<()> {
        if !self.marker_radius_px.is_finite() || self.marker_radius_px <= 0.0 {
            return Err(OverlayError::validation(
                "marker_radius_px must be finite and > 0",
            ));
        }
        if !self.label_font_px.is_finite() || self.label_font_px <= 0.0 {
            return Err(OverlayError::validation(
                "label_font_px must be finite and > 0",
            ));
        }
        if let Some(o) = self.opacity_override
            && !(0.0..=1.0).contains(&o)
        {
            return Err(OverlayError::validation(
                "opacity_override must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Opacity actually applied to a marker.
    pub fn effective_opacity(&self, marker_opacity: f32) -> f32 {
        self.opacity_override.unwrap_or(marker_opacity)
    }

    /// Whether any text rendering is needed.
    pub fn needs_text(&self) -> bool {
        self.show_labels || self.show_legend
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/config.rs"]
mod tests;
