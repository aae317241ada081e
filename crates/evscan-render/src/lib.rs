//! SVG rendering of evscan histograms.
//!
//! Panels are laid out on a tiled canvas (two side by side by default), each
//! showing the histogram's step outline over a grid with a summary box.

pub mod canvas;
pub mod color;
pub mod config;
pub mod layout;
pub mod plots;
pub mod primitives;

use std::path::Path;

use canvas::Canvas;
use config::RenderConfig;
use layout::tiles::TileLayout;
use thiserror::Error;

pub use color::Color;
pub use plots::histogram::Panel;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render `panels` row-major into a single SVG document.
pub fn render_tiled(panels: &[Panel], config: &RenderConfig) -> Result<String> {
    if panels.is_empty() {
        return Err(RenderError::Layout("nothing to render: no panels".into()));
    }
    let figure = &config.figure;
    let columns = figure.columns.clamp(1, panels.len());
    let layout = TileLayout::new(panels.len(), columns, figure.width / columns as f64, figure.row_height);

    let mut canvas = Canvas::new(layout.width(), layout.height())?;
    for (panel, tile) in panels.iter().zip(&layout.tiles) {
        plots::histogram::draw(&mut canvas, tile, panel, config);
    }
    Ok(canvas.finish_svg())
}

/// Render and write to `path`. Only SVG output is supported.
pub fn render_to_file(panels: &[Panel], path: &Path, config: &RenderConfig) -> Result<()> {
    check_output_path(path)?;
    let svg = render_tiled(panels, config)?;
    std::fs::write(path, svg)?;
    Ok(())
}

/// Fail with [`RenderError::Config`] unless `path` names an `.svg` file.
pub fn check_output_path(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("svg") => Ok(()),
        other => Err(RenderError::Config(format!(
            "unsupported output format {:?}: only .svg is supported",
            other.unwrap_or("")
        ))),
    }
}
