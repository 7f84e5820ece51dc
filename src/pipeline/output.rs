use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;

use crate::foundation::error::OverlayResult;

/// One written floor image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FloorArtifact {
    /// Floor identifier.
    pub floor_id: String,
    /// Floor display name.
    pub floor_name: String,
    /// Path of the written PNG.
    pub path: PathBuf,
    /// Markers drawn on the floor.
    pub markers_drawn: usize,
    /// Markers dropped as invalid.
    pub markers_rejected: usize,
}

/// A floor that produced no image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedFloor {
    /// Floor identifier.
    pub floor_id: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of one project render.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    /// Written images, in floor order.
    pub artifacts: Vec<FloorArtifact>,
    /// Skipped floors, only filled when requested.
    pub skipped: Vec<SkippedFloor>,
}

impl RenderReport {
    /// Paths of the written images.
    pub fn paths(&self) -> Vec<&Path> {
        self.artifacts.iter().map(|a| a.path.as_path()).collect()
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_manifest(&self, path: &Path) -> OverlayResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create manifest dir '{}'", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("write manifest '{}'", path.display()))?;
        Ok(())
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Hands out `<project>_<floor>.png` names, suffixing `-2`, `-3`, ... on collisions.
#[derive(Clone, Debug, Default)]
pub struct ArtifactNamer {
    used: HashSet<String>,
}

impl ArtifactNamer {
    /// Namer with no names taken.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next free file name for a floor.
    pub fn file_name(&mut self, project_id: &str, floor_id: &str) -> String {
        let stem = format!(
            "{}_{}",
            sanitize_component(project_id),
            sanitize_component(floor_id)
        );
        let mut candidate = format!("{stem}.png");
        let mut n = 2usize;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{stem}-{n}.png");
            n += 1;
        }
        candidate
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/output.rs"]
mod tests;
