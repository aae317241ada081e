use crate::config::RenderConfig;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Frame area inside a tile: room for the title above, tick labels and
    /// the axis label below, and y tick labels of `y_label_width` on the left.
    pub fn inside_tile(tile: &PlotArea, y_label_width: f64, config: &RenderConfig) -> Self {
        let font = &config.font;
        let top = font.title_size * 1.4 + 8.0;
        let bottom = font.tick_size + font.label_size + 20.0;
        let left = y_label_width + config.axes.tick_length + 14.0;
        let right = 12.0;
        Self {
            left: tile.left + left,
            top: tile.top + top,
            width: (tile.width - left - right).max(20.0),
            height: (tile.height - top - bottom).max(20.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_tile_is_contained() {
        let tile = PlotArea::manual(200.0, 0.0, 200.0, 240.0);
        let area = PlotArea::inside_tile(&tile, 20.0, &RenderConfig::default());
        assert!(area.left > tile.left && area.right() < tile.right());
        assert!(area.top > tile.top && area.bottom() < tile.bottom());
    }
}
