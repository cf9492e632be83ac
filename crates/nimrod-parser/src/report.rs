//! Human-readable header report.

use std::fmt;
use std::ops::RangeInclusive;

use crate::header::{category, element, text_lossy, Header};
use crate::raster::RasterFile;

/// Diagnostic listing of every header element and the raster extent.
///
/// Ranges in the summary are given to pixel edges, not centres.
pub struct HeaderReport<'a> {
    raster: &'a RasterFile,
}

impl<'a> HeaderReport<'a> {
    pub fn new(raster: &'a RasterFile) -> Self {
        Self { raster }
    }

    fn write_elements(
        f: &mut fmt::Formatter<'_>,
        header: &Header,
        range: RangeInclusive<usize>,
    ) -> fmt::Result {
        for (number, value) in header.elements_in(range) {
            writeln!(f, "  {:<3}\t{}", number, value)?;
        }
        Ok(())
    }
}

/// The first `count` element numbers from `first`; empty when `count` is 0.
fn leading(first: usize, count: usize) -> RangeInclusive<usize> {
    first..=(first + count).saturating_sub(1)
}

impl fmt::Display for HeaderReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.raster.header();
        let geometry = self.raster.geometry();
        let n_reals = header.n_data_specific_reals();
        let n_ints = header.n_data_specific_ints();

        writeln!(f, "NIMROD file raw header fields listed by element number:")?;
        writeln!(f, "General (Integer) header entries:")?;
        Self::write_elements(f, header, category::GENERAL_INTS)?;
        writeln!(f, "General (Real) header entries:")?;
        Self::write_elements(f, header, category::GENERAL_REALS)?;
        writeln!(f, "Data Specific (Real) header entries ({}):", n_reals)?;
        Self::write_elements(f, header, leading(*category::SPECIFIC_REALS.start(), n_reals))?;
        writeln!(f, "Data Specific (Integer) header entries ({}):", n_ints)?;
        Self::write_elements(f, header, leading(*category::SPECIFIC_INTS.start(), n_ints))?;
        writeln!(f, "Character header entries:")?;
        writeln!(f, "  {} Units:           {}", element::UNITS, text_lossy(header.units()))?;
        writeln!(
            f,
            "  {} Data source:     {}",
            element::DATA_SOURCE,
            text_lossy(header.data_source())
        )?;
        writeln!(f, "  {} Title of field:  {}", element::TITLE, text_lossy(header.title()))?;

        let edges = geometry.edge_extent();
        writeln!(f)?;
        writeln!(f, "Validity Time:  {}", header.valid_time())?;
        writeln!(
            f,
            "Easting range:  {:.1} - {:.1} (at pixel steps of {:.1})",
            edges.min_x, edges.max_x, geometry.x_pixel_size
        )?;
        writeln!(
            f,
            "Northing range: {:.1} - {:.1} (at pixel steps of {:.1})",
            edges.min_y, edges.max_y, geometry.y_pixel_size
        )?;
        writeln!(f, "Image size: {} rows x {} cols", geometry.rows, geometry.cols)
    }
}

impl RasterFile {
    /// Header report for diagnostics.
    pub fn report(&self) -> HeaderReport<'_> {
        HeaderReport::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_range() {
        assert_eq!(leading(60, 3), 60..=62);
        assert_eq!(leading(108, 1), 108..=108);
        assert!(leading(60, 0).is_empty());
    }
}
