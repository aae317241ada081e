use crate::layout::margins::PlotArea;

/// Row-major grid of equally sized tiles (e.g. two histograms side by side).
#[derive(Debug, Clone)]
pub struct TileLayout {
    pub columns: usize,
    pub rows: usize,
    pub tiles: Vec<PlotArea>,
}

impl TileLayout {
    /// Lay out `count` tiles of `tile_w`×`tile_h`, `columns` per row.
    /// `columns` is clamped to `1..=count`.
    pub fn new(count: usize, columns: usize, tile_w: f64, tile_h: f64) -> Self {
        let columns = columns.clamp(1, count.max(1));
        let rows = count.div_ceil(columns);
        let tiles = (0..count)
            .map(|i| {
                let (row, col) = (i / columns, i % columns);
                PlotArea::manual(col as f64 * tile_w, row as f64 * tile_h, tile_w, tile_h)
            })
            .collect();
        Self { columns, rows, tiles }
    }

    pub fn width(&self) -> f64 {
        self.tiles.first().map_or(0.0, |t| t.width * self.columns as f64)
    }

    pub fn height(&self) -> f64 {
        self.tiles.first().map_or(0.0, |t| t.height * self.rows as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_side_by_side() {
        let layout = TileLayout::new(2, 2, 200.0, 150.0);
        assert_eq!((layout.columns, layout.rows), (2, 1));
        assert_eq!(layout.tiles[1].left, 200.0);
        assert_eq!(layout.tiles[1].top, 0.0);
        assert_eq!((layout.width(), layout.height()), (400.0, 150.0));
    }

    #[test]
    fn wraps_into_rows() {
        let layout = TileLayout::new(3, 2, 100.0, 100.0);
        assert_eq!(layout.rows, 2);
        assert_eq!(layout.tiles[2].left, 0.0);
        assert_eq!(layout.tiles[2].top, 100.0);
        assert_eq!(layout.height(), 200.0);
    }

    #[test]
    fn columns_clamped() {
        assert_eq!(TileLayout::new(1, 4, 10.0, 10.0).columns, 1);
        assert_eq!(TileLayout::new(3, 0, 10.0, 10.0).columns, 1);
        assert!(TileLayout::new(0, 2, 10.0, 10.0).tiles.is_empty());
    }
}
