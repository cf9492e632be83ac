//! Bounding box clipping.
//!
//! Pixel coordinates are centres, so a box reaching within half a pixel of
//! the outermost centres still intersects the raster.

use nimrod_common::{BoundingBox, RasterGeometry};
use tracing::info;

use crate::error::{NimrodError, NimrodResult};
use crate::raster::RasterFile;

/// Inclusive pixel index window selected by a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub first_row: usize,
    pub last_row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

impl PixelWindow {
    pub fn rows(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn cols(&self) -> usize {
        self.last_col - self.first_col + 1
    }
}

/// Compute the pixel window covering `bbox`.
///
/// The lower northing bound is tested against half the *x* pixel size. This
/// matches existing NIMROD tooling and only differs from a symmetric test
/// for non-square pixels.
pub fn pixel_window(geometry: &RasterGeometry, bbox: &BoundingBox) -> NimrodResult<PixelWindow> {
    let x_left = geometry.x_left;
    let x_right = geometry.x_right();
    let y_top = geometry.y_top;
    let y_bottom = geometry.y_bottom();

    let out_of_range = || NimrodError::BboxRange {
        requested: *bbox,
        extent: geometry.centre_extent(),
    };

    let finite = [bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y]
        .iter()
        .all(|v| v.is_finite());
    if !finite
        || bbox.min_x > x_right + geometry.x_pixel_size / 2.0
        || bbox.max_x < x_left - geometry.x_pixel_size / 2.0
        || bbox.min_y > y_top + geometry.y_pixel_size / 2.0
        || bbox.max_y < y_bottom - geometry.x_pixel_size / 2.0
    {
        return Err(out_of_range());
    }

    // Limit to the centre extent of the raster
    let xmin = bbox.min_x.max(x_left);
    let xmax = bbox.max_x.min(x_right);
    let ymin = bbox.min_y.max(y_bottom);
    let ymax = bbox.max_y.min(y_top);

    let window = PixelWindow {
        first_row: geometry.row_index(ymax),
        last_row: geometry.row_index(ymin).min(geometry.rows - 1),
        first_col: geometry.column_index(xmin),
        last_col: geometry.column_index(xmax).min(geometry.cols - 1),
    };

    // Inverted boxes, or a box admitted only by the northing quirk, select nothing
    if window.first_row > window.last_row || window.first_col > window.last_col {
        return Err(out_of_range());
    }

    Ok(window)
}

impl RasterFile {
    /// Clip to all pixels intersecting `bbox`, returning a new raster.
    ///
    /// `self` is left untouched, including on error. Clipping never grows the
    /// raster: clipping again with a box containing the current extent
    /// returns an identical raster.
    pub fn clip(&self, bbox: &BoundingBox) -> NimrodResult<RasterFile> {
        let geometry = self.geometry();
        let window = pixel_window(&geometry, bbox)?;

        let cols = geometry.cols;
        let mut data = Vec::with_capacity(window.rows() * window.cols());
        for row in window.first_row..=window.last_row {
            let start = row * cols;
            data.extend_from_slice(&self.data()[start + window.first_col..=start + window.last_col]);
        }

        let mut header = self.header().clone();
        header.set_extent(
            window.rows(),
            window.cols(),
            geometry.y_top - window.first_row as f64 * geometry.y_pixel_size,
            geometry.x_left + window.first_col as f64 * geometry.x_pixel_size,
        );

        info!(
            rows = window.rows(),
            cols = window.cols(),
            first_row = window.first_row,
            first_col = window.first_col,
            "Clipped raster to bounding box"
        );

        Ok(RasterFile::from_parts(header, data))
    }

    /// Clip using the `xmin, xmax, ymin, ymax` argument order.
    pub fn clip_to(&self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> NimrodResult<RasterFile> {
        self.clip(&BoundingBox::from_extent(xmin, xmax, ymin, ymax))
    }
}
