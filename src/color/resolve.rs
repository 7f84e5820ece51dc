use crate::color::palette::{Palette, parse_hex_rgb};
use crate::foundation::core::Rgba8;
use crate::foundation::math::scale_alpha;

/// Which resolution step produced a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMatch {
    /// Case-insensitive palette name.
    Exact,
    /// Palette name after collapsing repeated characters.
    Corrected,
    /// Literal `#RRGGBB`.
    Hex,
    /// Nothing matched; the palette fallback was used.
    Fallback,
}

/// Outcome of resolving one color request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedColor {
    /// Final color, alpha already scaled by the base opacity.
    pub rgba: Rgba8,
    /// Resolution step that matched.
    pub matched: ColorMatch,
    /// Display name for legends: palette name, hex, or `"Unknown"`.
    pub label: String,
}

/// Resolves marker color requests against an explicit palette.
///
/// Order: exact name, duplicate-collapsed name, `#RRGGBB`, palette fallback. Never fails;
/// an unresolved request logs a warning and yields the fallback color.
#[derive(Clone, Copy, Debug)]
pub struct ColorResolver<'a> {
    palette: &'a Palette,
}

impl<'a> ColorResolver<'a> {
    /// Resolver over `palette`.
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }

    /// Resolve to RGBA, combining the color's own alpha with `base_opacity`.
    pub fn resolve(&self, request: &str, base_opacity: f32) -> Rgba8 {
        self.resolve_detailed(request, base_opacity).rgba
    }

    /// Like [`ColorResolver::resolve`] but also reports how the color was found.
    pub fn resolve_detailed(&self, request: &str, base_opacity: f32) -> ResolvedColor {
        let (base, matched, label) = if let Some(e) = self.palette.get(request) {
            (e.rgba, ColorMatch::Exact, e.name.clone())
        } else if let Some(e) = self.palette.get_collapsed(request) {
            tracing::debug!(request, corrected = %e.name, "corrected repeated characters in color");
            (e.rgba, ColorMatch::Corrected, e.name.clone())
        } else if let Some(c) = parse_hex_rgb(request) {
            (c, ColorMatch::Hex, c.hex_rgb())
        } else {
            tracing::warn!(request, "unresolved marker color, using default");
            (
                self.palette.fallback(),
                ColorMatch::Fallback,
                "Unknown".to_owned(),
            )
        };

        ResolvedColor {
            rgba: base.with_alpha(scale_alpha(base.a, base_opacity)),
            matched,
            label,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/resolve.rs"]
mod tests;
