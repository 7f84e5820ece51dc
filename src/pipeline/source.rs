use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};
use crate::model::floor::FloorPlan;
use crate::model::marker::MarkerRecord;

/// Upstream provider of floors and their markers.
///
/// Implementations are shared across render workers, hence `Sync`.
pub trait FloorSource: Sync {
    /// Project identifier, used in artifact names.
    fn project_id(&self) -> &str;

    /// Floors in render order.
    fn floor_ids(&self) -> Vec<String>;

    /// Floor lookup. `Ok(None)` means the floor is unknown; a known floor without a usable image
    /// comes back with `image: None`.
    fn floor_plan(&self, floor_id: &str) -> OverlayResult<Option<FloorPlan>>;

    /// Markers for a floor, as recorded upstream.
    fn markers(&self, floor_id: &str) -> Vec<MarkerRecord>;
}

/// One floor entry of a [`Project`] manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectFloor {
    /// Floor identifier, unique within the project.
    pub id: String,
    /// Display name; defaults to the id.
    #[serde(default)]
    pub name: Option<String>,
    /// Background image path, relative to the manifest directory.
    #[serde(default)]
    pub image: Option<String>,
    /// Declared image width; `0` or absent uses the decoded width.
    #[serde(default)]
    pub pixel_width: u32,
    /// Declared image height; `0` or absent uses the decoded height.
    #[serde(default)]
    pub pixel_height: u32,
    /// Real-world width.
    pub real_width: f64,
    /// Real-world height.
    pub real_height: f64,
    /// Access-point markers on this floor.
    #[serde(default)]
    pub markers: Vec<MarkerRecord>,
}

/// A project described by a JSON manifest next to its floor images.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier.
    pub project_id: String,
    /// Floors in render order.
    pub floors: Vec<ProjectFloor>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Project {
    /// Load a manifest; image paths resolve against the manifest's directory.
    pub fn from_path(path: &Path) -> OverlayResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read project '{}'", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::from_json_slice(&bytes, base_dir)
    }

    /// Parse a manifest whose image paths are relative to `base_dir`.
    pub fn from_json_slice(bytes: &[u8], base_dir: impl Into<PathBuf>) -> OverlayResult<Self> {
        let mut project: Self = serde_json::from_slice(bytes)?;
        project.base_dir = base_dir.into();
        project.validate()?;
        Ok(project)
    }

    fn validate(&mut self) -> OverlayResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(OverlayError::validation("project_id must be non-empty"));
        }

        let mut seen = std::collections::HashSet::new();
        for floor in &mut self.floors {
            if floor.id.trim().is_empty() {
                return Err(OverlayError::validation("floor id must be non-empty"));
            }
            if !seen.insert(floor.id.clone()) {
                return Err(OverlayError::validation(format!(
                    "duplicate floor id '{}'",
                    floor.id
                )));
            }
            if let Some(image) = &floor.image {
                let normalized = normalize_rel_path(image).map_err(|e| match e {
                    OverlayError::Validation(msg) => {
                        OverlayError::validation(format!("floor '{}': {msg}", floor.id))
                    }
                    other => other,
                })?;
                floor.image = Some(normalized);
            }
        }
        Ok(())
    }

    fn floor(&self, floor_id: &str) -> Option<&ProjectFloor> {
        self.floors.iter().find(|f| f.id == floor_id)
    }
}

impl FloorSource for Project {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn floor_ids(&self) -> Vec<String> {
        self.floors.iter().map(|f| f.id.clone()).collect()
    }

    fn floor_plan(&self, floor_id: &str) -> OverlayResult<Option<FloorPlan>> {
        let Some(floor) = self.floor(floor_id) else {
            return Ok(None);
        };

        let image = floor.image.as_deref().and_then(|rel| {
            let path = self.base_dir.join(rel);
            match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!(
                        floor = floor_id,
                        path = %path.display(),
                        error = %e,
                        "floor image unavailable"
                    );
                    None
                }
            }
        });

        Ok(Some(FloorPlan {
            id: floor.id.clone(),
            name: floor.name.clone().unwrap_or_else(|| floor.id.clone()),
            image,
            pixel_width: floor.pixel_width,
            pixel_height: floor.pixel_height,
            real_width: floor.real_width,
            real_height: floor.real_height,
        }))
    }

    fn markers(&self, floor_id: &str) -> Vec<MarkerRecord> {
        self.floor(floor_id)
            .map(|f| f.markers.clone())
            .unwrap_or_default()
    }
}

/// Normalize a manifest-relative path to forward slashes without `.` segments.
///
/// Absolute paths, empty paths and `..` segments are rejected.
pub fn normalize_rel_path(source: &str) -> OverlayResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.starts_with('/') || s.get(1..2) == Some(":") {
        return Err(OverlayError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(OverlayError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(OverlayError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(OverlayError::validation("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/source.rs"]
mod tests;
