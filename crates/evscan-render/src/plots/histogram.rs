//! One histogram per tile: step outline, grid, title and summary box.

use evscan::{FilledHistogram, HistogramSnapshot};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::RenderConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{draw_axes, draw_grid};
use crate::primitives::*;

/// A histogram plus everything needed to draw it.
#[derive(Debug, Clone)]
pub struct Panel {
    pub snapshot: HistogramSnapshot,
    pub title: String,
    pub x_label: String,
    pub color: Color,
    /// Draw the entries/mean/std-dev box.
    pub show_stats: bool,
}

impl Panel {
    /// Build from a filled pipeline slot; fails on a malformed color string.
    pub fn from_filled(filled: &FilledHistogram) -> crate::Result<Self> {
        let spec = &filled.spec;
        Ok(Self {
            snapshot: filled.snapshot(),
            title: spec.title.clone(),
            x_label: spec.x_label.clone(),
            color: Color::parse(&spec.color)?,
            show_stats: spec.show_stats,
        })
    }
}

/// Summary lines shown in the stats box, label and value.
pub fn stats_lines(snapshot: &HistogramSnapshot) -> Vec<(&'static str, String)> {
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), format_stat);
    vec![
        ("Entries", snapshot.entries.to_string()),
        ("Mean", fmt(snapshot.mean)),
        ("Std Dev", fmt(snapshot.std_dev)),
    ]
}

fn format_stat(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e5).contains(&a) { format!("{v:.3e}") } else { format!("{v:.4}") }
}

/// Draw `panel` into `tile`.
pub fn draw(canvas: &mut Canvas, tile: &PlotArea, panel: &Panel, config: &RenderConfig) {
    let snap = &panel.snapshot;
    let y_top = match snap.max_content() {
        m if m > 0.0 => m * (1.0 + config.axes.y_headroom),
        _ => 1.0,
    };
    let x_axis = Axis::bounded(snap.x_min, snap.x_max, config.axes.x_ticks).with_label(&panel.x_label);
    let y_axis = Axis::auto_linear(0.0, y_top, config.axes.y_ticks);

    let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };
    let y_label_width = y_axis
        .tick_labels
        .iter()
        .map(|l| canvas.text_width(l, &tick_style))
        .fold(0.0_f64, f64::max);
    let area = PlotArea::inside_tile(tile, y_label_width, config);

    if !panel.title.is_empty() {
        let style = TextStyle {
            size: config.font.title_size,
            bold: true,
            anchor: TextAnchor::Middle,
            ..Default::default()
        };
        canvas.text(area.left + area.width / 2.0, area.top - 8.0, &panel.title, &style);
    }

    draw_grid(canvas, &area, &x_axis, &y_axis, config);

    canvas.push_clip(area.left, area.top, area.width, area.height);
    let outline = step_outline(snap, &x_axis, &y_axis, &area);
    canvas.polyline(&outline, &LineStyle::solid(panel.color, 1.2));
    canvas.pop_clip();

    draw_axes(canvas, &area, &x_axis, &y_axis, config);

    if panel.show_stats {
        draw_stats_box(canvas, &area, snap, config);
    }
}

/// Histogram outline as a closed-at-baseline step path in pixel space.
fn step_outline(snap: &HistogramSnapshot, x_axis: &Axis, y_axis: &Axis, area: &PlotArea) -> Vec<(f64, f64)> {
    let px = |x: f64| x_axis.data_to_pixel(x, area.left, area.right());
    let py = |y: f64| y_axis.data_to_pixel(y, area.bottom(), area.top);

    let mut points = Vec::with_capacity(snap.bin_content.len() * 2 + 2);
    let Some(&first) = snap.bin_edges.first() else {
        return points;
    };
    points.push((px(first), py(0.0)));
    for (edges, &content) in snap.bin_edges.windows(2).zip(&snap.bin_content) {
        points.push((px(edges[0]), py(content)));
        points.push((px(edges[1]), py(content)));
    }
    if let Some(&last) = snap.bin_edges.last() {
        points.push((px(last), py(0.0)));
    }
    points
}

fn draw_stats_box(canvas: &mut Canvas, area: &PlotArea, snap: &HistogramSnapshot, config: &RenderConfig) {
    let lines = stats_lines(snap);
    let lh = config.stats.line_height;
    let w = config.stats.width.min(area.width);
    let h = lh * (lines.len() as f64 + 1.0) + 4.0;
    let x = area.right() - w;
    let y = area.top;

    canvas.rect(x, y, w, h, &Style::boxed(Color::WHITE, Color::BLACK, 0.6));

    let size = config.font.stats_size;
    let name_style = TextStyle {
        size,
        bold: true,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    canvas.text(x + w / 2.0, y + 2.0 + lh / 2.0, &snap.name, &name_style);

    let key_style = TextStyle { size, baseline: TextBaseline::Central, ..Default::default() };
    let value_style = TextStyle { anchor: TextAnchor::End, ..key_style.clone() };
    for (i, (key, value)) in lines.iter().enumerate() {
        let ly = y + 2.0 + lh * (i as f64 + 1.5);
        canvas.text(x + 4.0, ly, key, &key_style);
        canvas.text(x + w - 4.0, ly, value, &value_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evscan::Histogram;

    fn snapshot(values: &[f64]) -> HistogramSnapshot {
        let mut h = Histogram::new(4, 0.0, 4.0).unwrap();
        for &v in values {
            h.fill(v, 1.0);
        }
        h.snapshot("h")
    }

    #[test]
    fn outline_follows_bins() {
        let snap = snapshot(&[0.5, 1.5, 1.5]);
        let area = PlotArea::manual(0.0, 0.0, 40.0, 20.0);
        let x_axis = Axis::bounded(0.0, 4.0, 5);
        let y_axis = Axis::bounded(0.0, 2.0, 3);
        let pts = step_outline(&snap, &x_axis, &y_axis, &area);
        assert_eq!(pts.len(), 10);
        assert_eq!(pts[0], (0.0, 20.0));
        assert_eq!(pts[1], (0.0, 10.0));
        assert_eq!(pts[3], (10.0, 0.0));
        assert_eq!(pts[9], (40.0, 20.0));
    }

    #[test]
    fn stats_lines_for_empty_histogram() {
        let lines = stats_lines(&snapshot(&[]));
        assert_eq!(lines[0], ("Entries", "0".to_string()));
        assert_eq!(lines[1].1, "n/a");
        assert_eq!(lines[2].1, "n/a");
    }

    #[test]
    fn stats_lines_values() {
        let lines = stats_lines(&snapshot(&[1.0, 3.0]));
        assert_eq!(lines[0].1, "2");
        assert_eq!(lines[1].1, "2.0000");
        assert_eq!(lines[2].1, "1.0000");
        assert_eq!(format_stat(123456.0), "1.235e5");
    }

    #[test]
    fn draws_title_and_stats() {
        let panel = Panel {
            snapshot: snapshot(&[1.0, 2.0]),
            title: "Reconstructed Jet Mass".into(),
            x_label: "Jet Mass [GeV/c^2]".into(),
            color: Color::rgb(0, 0, 255),
            show_stats: true,
        };
        let mut canvas = Canvas::new(300.0, 200.0).unwrap();
        draw(&mut canvas, &PlotArea::manual(0.0, 0.0, 300.0, 200.0), &panel, &RenderConfig::default());
        let svg = canvas.finish_svg();
        assert!(svg.contains("Reconstructed Jet Mass</text>"));
        assert!(svg.contains("Std Dev</text>"));
        assert!(svg.contains(r##"<polyline points="##));
        assert!(svg.contains(r##"stroke="#0000ff""##));
    }
}
