use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::RenderConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw the dashed grid at major tick positions. Call before the data so the
/// outline sits on top.
pub fn draw_grid(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, config: &RenderConfig) {
    if !config.grid.show {
        return;
    }
    let grid_style = LineStyle::dashed(config.grid.color.with_alpha(config.grid.alpha), 0.5);
    for &val in &x_axis.tick_positions {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if inside(px, area.left, area.right()) {
            canvas.line(px, area.top, px, area.bottom(), &grid_style);
        }
    }
    for &val in &y_axis.tick_positions {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if inside(py, area.top, area.bottom()) {
            canvas.line(area.left, py, area.right(), py, &grid_style);
        }
    }
}

/// Draw the box frame with inward ticks, tick labels and the x-axis label.
pub fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, config: &RenderConfig) {
    let frame_style = LineStyle::solid(Color::BLACK, 0.8);
    let tick_style = LineStyle::solid(Color::BLACK, 0.6);
    let minor_tick_style = LineStyle::solid(Color::BLACK, 0.4);
    let tl = config.axes.tick_length;
    let mtl = config.axes.minor_tick_length;

    draw_frame(canvas, area, &frame_style);

    let x_label_style = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if !inside(px, area.left, area.right()) {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() - tl, &tick_style);
        canvas.line(px, area.top, px, area.top + tl, &tick_style);
        if let Some(label) = x_axis.tick_labels.get(i) {
            canvas.text(px, area.bottom() + 3.0, label, &x_label_style);
        }
    }
    for &val in &x_axis.minor_ticks {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if inside(px, area.left, area.right()) {
            canvas.line(px, area.bottom(), px, area.bottom() - mtl, &minor_tick_style);
        }
    }

    let y_label_style = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if !inside(py, area.top, area.bottom()) {
            continue;
        }
        canvas.line(area.left, py, area.left + tl, py, &tick_style);
        canvas.line(area.right(), py, area.right() - tl, py, &tick_style);
        if let Some(label) = y_axis.tick_labels.get(i) {
            canvas.text(area.left - 4.0, py, label, &y_label_style);
        }
    }
    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if inside(py, area.top, area.bottom()) {
            canvas.line(area.left, py, area.left + mtl, py, &minor_tick_style);
        }
    }

    if !x_axis.label.is_empty() {
        let style = TextStyle {
            size: config.font.label_size,
            anchor: TextAnchor::End,
            ..Default::default()
        };
        let y = area.bottom() + config.font.tick_size + config.font.label_size + 8.0;
        canvas.text(area.right(), y, &x_axis.label, &style);
    }
    if !y_axis.label.is_empty() {
        let style = TextStyle {
            size: config.font.label_size,
            anchor: TextAnchor::End,
            ..Default::default()
        };
        let x = area.left - config.font.label_size - 16.0;
        canvas.text_rotated(x, area.top, &y_axis.label, &style, -90.0);
    }
}

fn draw_frame(canvas: &mut Canvas, area: &PlotArea, style: &LineStyle) {
    canvas.line(area.left, area.top, area.right(), area.top, style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), style);
    canvas.line(area.left, area.top, area.left, area.bottom(), style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), style);
}

fn inside(px: f64, lo: f64, hi: f64) -> bool {
    px >= lo - 0.5 && px <= hi + 0.5
}
