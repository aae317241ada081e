use serde::Deserialize;

use crate::color::Color;

/// Rendering configuration (JSON or programmatic).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Total figure width in points; each tile gets `width / columns`.
    pub width: f64,
    /// Height of one tile row in points.
    pub row_height: f64,
    pub columns: usize,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 425.2, // 15cm
            row_height: 283.5, // 10cm
            columns: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub stats_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { title_size: 11.0, label_size: 9.0, tick_size: 7.5, stats_size: 7.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_length: f64,
    pub minor_tick_length: f64,
    pub x_ticks: usize,
    pub y_ticks: usize,
    /// Headroom above the tallest bin, as a fraction of its content.
    pub y_headroom: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self { tick_length: 4.0, minor_tick_length: 2.0, x_ticks: 6, y_ticks: 5, y_headroom: 0.15 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::rgb(0x99, 0x99, 0x99), alpha: 0.6 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub width: f64,
    pub line_height: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { width: 78.0, line_height: 10.0 }
    }
}
