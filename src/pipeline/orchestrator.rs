use std::path::PathBuf;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::color::palette::Palette;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::model::config::RenderConfig;
use crate::model::marker::MarkerRecord;
use crate::pipeline::output::{ArtifactNamer, FloorArtifact, RenderReport, SkippedFloor};
use crate::pipeline::scene::MarkerRenderer;
use crate::pipeline::source::FloorSource;
use crate::render::text::TextRasterizer;

/// Where and how a project render runs.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Directory the PNGs are written to; created if missing.
    pub out_dir: PathBuf,
    /// Render floors concurrently, one floor per task.
    pub parallel: bool,
    /// Worker count for parallel mode; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Report skipped floors with their reasons.
    pub report_skipped: bool,
}

impl RenderOpts {
    /// Sequential render into `out_dir` without skip reporting.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            parallel: false,
            threads: None,
            report_skipped: false,
        }
    }
}

struct FloorJob {
    floor_id: String,
    markers: Vec<MarkerRecord>,
    file_name: String,
}

/// Render every floor of `source` that has markers.
///
/// Per-floor failures (missing image, undecodable image, every marker rejected, write errors)
/// skip that floor and never abort the run. Only setup problems are returned as errors:
/// invalid config or thread count, and an output directory that cannot be created.
#[tracing::instrument(skip_all, fields(project = %source.project_id()))]
pub fn render_project<S: FloorSource + ?Sized>(
    source: &S,
    palette: &Palette,
    config: &RenderConfig,
    opts: &RenderOpts,
) -> OverlayResult<RenderReport> {
    config.validate()?;
    let pool = if opts.parallel {
        Some(build_thread_pool(opts.threads)?)
    } else {
        None
    };
    std::fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("create output dir '{}'", opts.out_dir.display()))?;

    let text = config.needs_text().then(TextRasterizer::system);
    let renderer = MarkerRenderer::new(palette, config, text.as_ref());

    let mut namer = ArtifactNamer::new();
    let mut jobs = Vec::new();
    for floor_id in source.floor_ids() {
        let markers = source.markers(&floor_id);
        if markers.is_empty() {
            tracing::debug!(floor = %floor_id, "no markers, not rendering");
            continue;
        }
        let file_name = namer.file_name(source.project_id(), &floor_id);
        jobs.push(FloorJob {
            floor_id,
            markers,
            file_name,
        });
    }

    let outcomes: Vec<Result<FloorArtifact, SkippedFloor>> = match &pool {
        Some(pool) => pool.install(|| {
            jobs.par_iter()
                .map(|job| render_job(source, &renderer, opts, job))
                .collect()
        }),
        None => jobs
            .iter()
            .map(|job| render_job(source, &renderer, opts, job))
            .collect(),
    };

    let mut report = RenderReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(artifact) => report.artifacts.push(artifact),
            Err(skip) if opts.report_skipped => report.skipped.push(skip),
            Err(_) => {}
        }
    }

    tracing::info!(
        rendered = report.artifacts.len(),
        floors = jobs.len(),
        "project render finished"
    );
    Ok(report)
}

fn render_job<S: FloorSource + ?Sized>(
    source: &S,
    renderer: &MarkerRenderer<'_>,
    opts: &RenderOpts,
    job: &FloorJob,
) -> Result<FloorArtifact, SkippedFloor> {
    let skip = |e: OverlayError| {
        tracing::warn!(floor = %job.floor_id, error = %e, "skipping floor");
        SkippedFloor {
            floor_id: job.floor_id.clone(),
            reason: e.to_string(),
        }
    };

    let floor = source
        .floor_plan(&job.floor_id)
        .map_err(skip)?
        .ok_or_else(|| skip(OverlayError::data("floor not found")))?;
    let rendered = renderer.render_floor(&floor, &job.markers).map_err(skip)?;

    let path = opts.out_dir.join(&job.file_name);
    rendered.image.save_png(&path).map_err(skip)?;
    tracing::info!(floor = %job.floor_id, path = %path.display(), "wrote floor image");

    Ok(FloorArtifact {
        floor_id: floor.id,
        floor_name: floor.name,
        path,
        markers_drawn: rendered.markers_drawn,
        markers_rejected: rendered.markers_rejected,
    })
}

fn build_thread_pool(threads: Option<usize>) -> OverlayResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(OverlayError::validation("threads must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| OverlayError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
