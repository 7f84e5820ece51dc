use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Color used when a request cannot be resolved: pale pink, partially transparent on its own.
pub const DEFAULT_MARKER_COLOR: Rgba8 = Rgba8::new(255, 204, 204, 160);

const STANDARD_COLORS: &[(&str, [u8; 3])] = &[
    ("Yellow", [255, 255, 0]),
    ("Orange", [255, 165, 0]),
    ("Red", [255, 0, 0]),
    ("Pink", [255, 192, 203]),
    ("Violet", [238, 130, 238]),
    ("Purple", [128, 0, 128]),
    ("Blue", [0, 0, 255]),
    ("Navy", [0, 0, 128]),
    ("Cyan", [0, 255, 255]),
    ("Teal", [0, 128, 128]),
    ("Green", [0, 128, 0]),
    ("Lime", [0, 255, 0]),
    ("Olive", [128, 128, 0]),
    ("Brown", [165, 42, 42]),
    ("Maroon", [128, 0, 0]),
    ("Magenta", [255, 0, 255]),
    ("Gold", [255, 215, 0]),
    ("Beige", [245, 245, 220]),
    ("Gray", [128, 128, 128]),
    ("Grey", [128, 128, 128]),
    ("Silver", [192, 192, 192]),
    ("White", [255, 255, 255]),
    ("Black", [0, 0, 0]),
];

/// A named palette color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Canonical display name.
    pub name: String,
    /// Color, possibly with intrinsic translucency.
    pub rgba: Rgba8,
}

/// Immutable name → color table used by the color resolver.
///
/// Lookups are case-insensitive. A second index keyed by the duplicate-collapsed name backs the
/// typo-correction retry; when two names collapse to the same key, the one added first wins.
#[derive(Clone, Debug)]
pub struct Palette {
    by_name: BTreeMap<String, PaletteEntry>,
    by_collapsed: BTreeMap<String, String>,
    fallback: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

impl Palette {
    /// Empty palette with the given fallback color.
    pub fn empty(fallback: Rgba8) -> Self {
        Self {
            by_name: BTreeMap::new(),
            by_collapsed: BTreeMap::new(),
            fallback,
        }
    }

    /// Built-in marker colors.
    pub fn standard() -> Self {
        Self::empty(DEFAULT_MARKER_COLOR).with_entries(
            STANDARD_COLORS
                .iter()
                .map(|(name, [r, g, b])| (*name, Rgba8::opaque(*r, *g, *b))),
        )
    }

    /// Add or replace entries, returning the extended palette.
    pub fn with_entries<N: Into<String>>(
        mut self,
        entries: impl IntoIterator<Item = (N, Rgba8)>,
    ) -> Self {
        for (name, rgba) in entries {
            let name = name.into();
            let key = name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            self.by_collapsed
                .entry(collapse_repeats(&key))
                .or_insert_with(|| key.clone());
            self.by_name.insert(key, PaletteEntry { name, rgba });
        }
        self
    }

    /// Standard palette extended with the entries of a JSON palette file.
    ///
    /// The file is an object mapping names to `"#RRGGBB"`, `"#RRGGBBAA"`, `[r, g, b]` or
    /// `[r, g, b, a]`.
    pub fn from_json_path(path: &Path) -> OverlayResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read palette '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    /// Parse a JSON palette (see [`Palette::from_json_path`]).
    pub fn from_json_slice(bytes: &[u8]) -> OverlayResult<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        let raw: BTreeMap<String, Repr> = serde_json::from_slice(bytes)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (name, repr) in raw {
            let rgba = match repr {
                Repr::Hex(s) => parse_hex_rgba(&s).ok_or_else(|| {
                    OverlayError::validation(format!(
                        "palette color \"{name}\": hex must be #RRGGBB or #RRGGBBAA"
                    ))
                })?,
                Repr::Arr(v) => match v.as_slice() {
                    [r, g, b] => Rgba8::opaque(*r, *g, *b),
                    [r, g, b, a] => Rgba8::new(*r, *g, *b, *a),
                    _ => {
                        return Err(OverlayError::validation(format!(
                            "palette color \"{name}\": array must be [r,g,b] or [r,g,b,a]"
                        )));
                    }
                },
            };
            entries.push((name, rgba));
        }
        Ok(Self::standard().with_entries(entries))
    }

    /// Exact, case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&PaletteEntry> {
        self.by_name.get(&name.trim().to_lowercase())
    }

    /// Lookup after collapsing runs of repeated characters on both sides.
    pub fn get_collapsed(&self, name: &str) -> Option<&PaletteEntry> {
        let collapsed = collapse_repeats(&name.trim().to_lowercase());
        self.by_collapsed
            .get(&collapsed)
            .and_then(|key| self.by_name.get(key))
    }

    /// Color used for unresolved requests.
    pub fn fallback(&self) -> Rgba8 {
        self.fallback
    }

    /// Number of named entries.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// `true` when the palette has no named entries.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Collapse every run of identical consecutive characters into one (`"yelllow"` → `"yelow"`).
pub fn collapse_repeats(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = None;
    for c in s.chars() {
        if last != Some(c) {
            out.push(c);
        }
        last = Some(c);
    }
    out
}

/// Parse exactly `#RRGGBB` (case-insensitive, surrounding whitespace ignored).
pub fn parse_hex_rgb(s: &str) -> Option<Rgba8> {
    let digits = s.trim().strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let [r, g, b] = hex_bytes::<3>(digits)?;
    Some(Rgba8::opaque(r, g, b))
}

/// Parse `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_rgba(s: &str) -> Option<Rgba8> {
    let digits = s.trim().strip_prefix('#')?;
    match digits.len() {
        6 => parse_hex_rgb(s),
        8 => {
            let [r, g, b, a] = hex_bytes::<4>(digits)?;
            Some(Rgba8::new(r, g, b, a))
        }
        _ => None,
    }
}

fn hex_bytes<const N: usize>(digits: &str) -> Option<[u8; N]> {
    if digits.len() != N * 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/color/palette.rs"]
mod tests;
