//! Raster geometry for NIMROD grids.
//!
//! Coordinates follow the pixel-centre convention: `x_left`/`y_top` are the
//! centre of the first column/row, and the derived `x_right`/`y_bottom` are
//! centres of the last column/row. Row 0 is the northernmost row.

use crate::BoundingBox;
use serde::{Deserialize, Serialize};

/// Geometry of a regular north-up raster grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterGeometry {
    /// Number of rows (header element 16)
    pub rows: usize,
    /// Number of columns (header element 17)
    pub cols: usize,
    /// Centre of the first (northernmost) row (element 34)
    pub y_top: f64,
    /// Row spacing (element 35)
    pub y_pixel_size: f64,
    /// Centre of the first (westernmost) column (element 36)
    pub x_left: f64,
    /// Column spacing (element 37)
    pub x_pixel_size: f64,
}

impl RasterGeometry {
    /// Create a new raster geometry.
    pub fn new(
        rows: usize,
        cols: usize,
        y_top: f64,
        y_pixel_size: f64,
        x_left: f64,
        x_pixel_size: f64,
    ) -> Self {
        Self {
            rows,
            cols,
            y_top,
            y_pixel_size,
            x_left,
            x_pixel_size,
        }
    }

    /// Centre of the last column.
    pub fn x_right(&self) -> f64 {
        self.x_left + self.x_pixel_size * (self.cols as f64 - 1.0)
    }

    /// Centre of the last (southernmost) row.
    pub fn y_bottom(&self) -> f64 {
        self.y_top - self.y_pixel_size * (self.rows as f64 - 1.0)
    }

    /// Extent spanned by pixel centres.
    pub fn centre_extent(&self) -> BoundingBox {
        BoundingBox::new(self.x_left, self.y_bottom(), self.x_right(), self.y_top)
    }

    /// Extent of the outer pixel edges (centres expanded by half a pixel).
    pub fn edge_extent(&self) -> BoundingBox {
        let half_x = self.x_pixel_size / 2.0;
        let half_y = self.y_pixel_size / 2.0;
        BoundingBox::new(
            self.x_left - half_x,
            self.y_bottom() - half_y,
            self.x_right() + half_x,
            self.y_top + half_y,
        )
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Pixel-square check used by formats that only carry one cell size.
    pub fn has_square_pixels(&self) -> bool {
        self.x_pixel_size == self.y_pixel_size
    }

    /// Column index of the pixel whose centre is nearest to `x`.
    ///
    /// Rounds half up. `x` must not lie west of `x_left`; offsets that are
    /// negative saturate to column 0.
    pub fn column_index(&self, x: f64) -> usize {
        round_half_up((x - self.x_left) / self.x_pixel_size)
    }

    /// Row index of the pixel whose centre is nearest to `y`, counting
    /// southwards from `y_top`.
    pub fn row_index(&self, y: f64) -> usize {
        round_half_up((self.y_top - y) / self.y_pixel_size)
    }

    /// Column centre eastings, west to east.
    pub fn x_coordinates(&self) -> Vec<f64> {
        linspace(self.x_left, self.x_right(), self.cols)
    }

    /// Row centre northings, ascending from `y_bottom` to `y_top`.
    ///
    /// Note this is the reverse of the storage order of rows.
    pub fn y_coordinates(&self) -> Vec<f64> {
        linspace(self.y_bottom(), self.y_top, self.rows)
    }
}

/// `floor(value + 0.5)` for non-negative input, via truncation.
fn round_half_up(value: f64) -> usize {
    // `as` truncates toward zero and saturates negatives and NaN to 0
    (value + 0.5) as usize
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uk_1km() -> RasterGeometry {
        RasterGeometry::new(2175, 1725, 1_199_500.0, 1000.0, -404_500.0, 1000.0)
    }

    #[test]
    fn test_derived_centres() {
        let grid = RasterGeometry::new(2, 3, 6000.0, 1000.0, 0.0, 1000.0);
        assert_eq!(grid.x_right(), 2000.0);
        assert_eq!(grid.y_bottom(), 5000.0);
        assert_eq!(grid.len(), 6);
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_edge_extent_expands_half_pixel() {
        let grid = uk_1km();
        let edges = grid.edge_extent();
        assert_eq!(edges.min_x, -405_000.0);
        assert_eq!(edges.max_x, 1_320_000.0);
        assert_eq!(edges.max_y, 1_200_000.0);
        assert_eq!(edges.min_y, -975_000.0);
    }

    #[test]
    fn test_pixel_index_rounding() {
        let grid = RasterGeometry::new(2, 3, 6000.0, 1000.0, 0.0, 1000.0);
        assert_eq!(grid.column_index(0.0), 0);
        assert_eq!(grid.column_index(499.0), 0);
        assert_eq!(grid.column_index(500.0), 1);
        assert_eq!(grid.column_index(2000.0), 2);
        assert_eq!(grid.row_index(6000.0), 0);
        assert_eq!(grid.row_index(5500.0), 1);
        assert_eq!(grid.row_index(5501.0), 0);
        // West of the first centre saturates
        assert_eq!(grid.column_index(-400.0), 0);
    }

    #[test]
    fn test_axis_coordinates() {
        let grid = RasterGeometry::new(2, 3, 6000.0, 1000.0, 0.0, 1000.0);
        assert_eq!(grid.x_coordinates(), vec![0.0, 1000.0, 2000.0]);
        assert_eq!(grid.y_coordinates(), vec![5000.0, 6000.0]);

        let single = RasterGeometry::new(1, 1, 10.0, 2.0, 4.0, 2.0);
        assert_eq!(single.x_coordinates(), vec![4.0]);
        assert_eq!(single.y_coordinates(), vec![10.0]);
    }

    #[test]
    fn test_square_pixels() {
        assert!(uk_1km().has_square_pixels());
        let grid = RasterGeometry::new(2, 2, 0.0, 1000.0, 0.0, 2000.0);
        assert!(!grid.has_square_pixels());
    }
}
