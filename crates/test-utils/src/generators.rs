//! Raster value generators for synthetic NIMROD payloads.

/// Creates a raster with predictable values.
///
/// Each cell value is `row * 100 + col`, so `grid[row * cols + col]` can be
/// checked directly. Intended for grids under 100 columns and 327 rows.
///
/// # Example
///
/// ```
/// use test_utils::create_test_raster;
///
/// let grid = create_test_raster(3, 4);
/// assert_eq!(grid.len(), 12);
/// assert_eq!(grid[0], 0);
/// assert_eq!(grid[1], 1);   // row 0, col 1
/// assert_eq!(grid[4], 100); // row 1, col 0
/// ```
pub fn create_test_raster(rows: usize, cols: usize) -> Vec<i16> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push((row * 100 + col) as i16);
        }
    }
    data
}

/// Creates a rain-rate-like raster in units of mm/h * 32.
///
/// A single shower centred in the grid, falling off linearly to dry
/// ground, with `missing` around the outermost ring of cells.
pub fn create_rain_raster(rows: usize, cols: usize, missing: i16) -> Vec<i16> {
    let centre_row = rows as f64 / 2.0;
    let centre_col = cols as f64 / 2.0;
    let radius = centre_row.min(centre_col).max(1.0);

    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            if row == 0 || col == 0 || row + 1 == rows || col + 1 == cols {
                data.push(missing);
                continue;
            }
            let dr = row as f64 - centre_row;
            let dc = col as f64 - centre_col;
            let distance = (dr * dr + dc * dc).sqrt();
            // 8 mm/h at the centre
            let rate = (1.0 - distance / radius).max(0.0) * 8.0 * 32.0;
            data.push(rate as i16);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_raster() {
        let grid = create_test_raster(3, 4);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid[2 * 4 + 3], 203);
    }

    #[test]
    fn test_create_rain_raster() {
        let grid = create_rain_raster(10, 10, -1);
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], -1);
        assert_eq!(grid[99], -1);
        // Centre is the wettest cell
        let centre = grid[5 * 10 + 5];
        assert_eq!(centre, 256);
        assert!(grid.iter().all(|v| *v <= centre));
    }
}
