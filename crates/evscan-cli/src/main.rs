//! evscan CLI

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use evscan::{Catalog, Cursor, HistogramSnapshot, Resource, ScanConfig};
use evscan_render::Panel;
use evscan_render::config::RenderConfig;

#[derive(Parser)]
#[command(name = "evscan")]
#[command(about = "Decode a jet event tree and plot tower multiplicity and jet mass")]
#[command(version)]
struct Cli {
    /// Event store to scan (JSON catalog)
    input: PathBuf,

    /// Object key of the tree to scan (overrides the config)
    #[arg(short, long)]
    tree: Option<String>,

    /// Scan configuration (JSON): histograms, field mapping, progress cadence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plot styling (JSON)
    #[arg(long)]
    style: Option<PathBuf>,

    /// Output plot (SVG)
    #[arg(short, long, default_value = "plots.svg")]
    output: PathBuf,

    /// Also write histogram snapshots as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// List catalog objects and exit
    #[arg(long)]
    list: bool,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let resource = Resource::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;

    if cli.list {
        for key in resource.list_keys() {
            println!("{}\t{}", key.class_name, key.name);
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    if let Some(tree) = cli.tree {
        config.tree = tree;
    }
    let style = load_style(cli.style.as_deref())?;

    cmd_scan(&resource, &config, &style, &cli.output, cli.json.as_deref())
}

fn load_style(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read style {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid style {}", path.display()))
}

fn cmd_scan(
    resource: &Resource,
    config: &ScanConfig,
    style: &RenderConfig,
    output: &Path,
    json: Option<&Path>,
) -> Result<()> {
    let cursor = Cursor::open(resource, &config.tree)
        .with_context(|| format!("no '{}' in {}", config.tree, resource.path().display()))?;
    tracing::info!(tree = %cursor.name(), nevts = cursor.total_rows(), "tree");
    drop(cursor);

    let start = std::time::Instant::now();
    let out = evscan::pipeline::run(resource, config, |p| {
        tracing::info!(entry = p.entry, event = ?p.event, "evt");
    })
    .with_context(|| format!("scan of '{}' in {} failed", config.tree, resource.path().display()))?;

    tracing::info!(
        entries = out.entries,
        histograms = out.histograms.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scan complete"
    );

    let panels = out
        .histograms
        .iter()
        .map(Panel::from_filled)
        .collect::<evscan_render::Result<Vec<_>>>()
        .context("invalid histogram display settings")?;
    evscan_render::check_output_path(output)
        .with_context(|| format!("cannot write plot {}", output.display()))?;
    let svg = evscan_render::render_tiled(&panels, style).context("failed to render plot")?;
    let snapshots = match json {
        Some(_) => {
            let snapshots: Vec<HistogramSnapshot> = out.histograms.iter().map(|h| h.snapshot()).collect();
            Some(serde_json::to_string_pretty(&snapshots)?)
        }
        None => None,
    };

    std::fs::write(output, svg).with_context(|| format!("failed to write plot {}", output.display()))?;
    tracing::info!(path = %output.display(), "plot written");

    if let (Some(path), Some(text)) = (json, snapshots) {
        if let Err(err) = std::fs::write(path, text) {
            // Leave no plot behind for a failed run.
            let _ = std::fs::remove_file(output);
            return Err(err).with_context(|| format!("failed to write {}", path.display()));
        }
        tracing::info!(path = %path.display(), "snapshots written");
    }
    Ok(())
}
