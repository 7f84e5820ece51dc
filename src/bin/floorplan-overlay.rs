use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use floorplan_overlay::{ColorResolver, Palette, Project, RenderConfig, RenderOpts};

#[derive(Parser, Debug)]
#[command(name = "floorplan-overlay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw access-point markers onto every floor of a project.
    Render(RenderArgs),
    /// Show how a color request resolves.
    ResolveColor(ResolveColorArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Project manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory for the floor PNGs.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render config JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Palette JSON extending the standard colors.
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Marker radius in pixels.
    #[arg(long)]
    radius: Option<f64>,

    /// Opacity applied to every marker, in [0, 1].
    #[arg(long)]
    opacity: Option<f32>,

    /// Do not draw marker labels.
    #[arg(long, default_value_t = false)]
    no_labels: bool,

    /// Do not draw facing-direction arrows.
    #[arg(long, default_value_t = false)]
    no_arrows: bool,

    /// Do not draw the color legend.
    #[arg(long, default_value_t = false)]
    no_legend: bool,

    /// Render floors in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Also write a JSON manifest of artifacts and skipped floors.
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ResolveColorArgs {
    /// Color name or #RRGGBB.
    request: String,

    /// Base opacity in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    opacity: f32,

    /// Palette JSON extending the standard colors.
    #[arg(long)]
    palette: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::ResolveColor(args) => cmd_resolve_color(args),
    }
}

fn load_palette(path: Option<&PathBuf>) -> anyhow::Result<Palette> {
    match path {
        Some(p) => Palette::from_json_path(p)
            .with_context(|| format!("load palette '{}'", p.display())),
        None => Ok(Palette::standard()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let project = Project::from_path(&args.in_path)
        .with_context(|| format!("load project '{}'", args.in_path.display()))?;
    let palette = load_palette(args.palette.as_ref())?;

    let mut config = match &args.config {
        Some(p) => RenderConfig::from_path(p)
            .with_context(|| format!("load render config '{}'", p.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(r) = args.radius {
        config.marker_radius_px = r;
    }
    if let Some(o) = args.opacity {
        config.opacity_override = Some(o);
    }
    config.show_labels &= !args.no_labels;
    config.show_arrows &= !args.no_arrows;
    config.show_legend &= !args.no_legend;

    let opts = RenderOpts {
        out_dir: args.out_dir,
        parallel: args.parallel,
        threads: args.threads,
        report_skipped: true,
    };
    let report = floorplan_overlay::render_project(&project, &palette, &config, &opts)?;

    for path in report.paths() {
        println!("{}", path.display());
    }
    for skip in &report.skipped {
        eprintln!("skipped floor {}: {}", skip.floor_id, skip.reason);
    }

    if let Some(manifest) = &args.manifest {
        report.write_manifest(manifest)?;
        eprintln!("wrote {}", manifest.display());
    }
    Ok(())
}

fn cmd_resolve_color(args: ResolveColorArgs) -> anyhow::Result<()> {
    let palette = load_palette(args.palette.as_ref())?;
    let resolved = ColorResolver::new(&palette).resolve_detailed(&args.request, args.opacity);
    let c = resolved.rgba;
    println!(
        "{} {} {} {} ({:?}, {})",
        c.r, c.g, c.b, c.a, resolved.matched, resolved.label
    );
    Ok(())
}
