//! ASCII grid output.
//!
//! Writes a labelled text header followed by one line of space separated
//! integers per raster row, northernmost row first. Coordinates are pixel
//! centres, not the lower-left corner used by ESRI `xllcorner` headers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::NimrodResult;
use crate::raster::RasterFile;

/// Format a real the way the header labels expect: integral values keep a
/// trailing `.0`.
fn format_real(value: f64) -> String {
    format!("{:?}", value)
}

/// Write `raster` as an ASCII grid.
///
/// The format has a single cell size; when pixels are not square a warning
/// is logged and the y pixel size is used.
pub fn write_ascii_grid<W: Write>(raster: &RasterFile, mut writer: W) -> NimrodResult<()> {
    let geometry = raster.geometry();

    if !geometry.has_square_pixels() {
        warn!(
            x_pixel_size = geometry.x_pixel_size,
            y_pixel_size = geometry.y_pixel_size,
            "Non-square pixels; ASCII grid cell size uses y pixel size"
        );
    }

    writeln!(writer, "xmin: {} ", format_real(geometry.x_left))?;
    writeln!(writer, "xmax: {} ", format_real(geometry.x_right()))?;
    writeln!(writer, "ymin: {} ", format_real(geometry.y_bottom()))?;
    writeln!(writer, "ymax: {} ", format_real(geometry.y_top))?;
    writeln!(writer, "ncols: {} ", geometry.cols)?;
    writeln!(writer, "nrows: {} ", geometry.rows)?;
    writeln!(writer, "cellsize : {} ", format_real(geometry.y_pixel_size))?;
    writeln!(
        writer,
        "na_value: {} ",
        format_real(f64::from(raster.header().missing_data_value()))
    )?;

    let mut line = String::new();
    for row in raster.rows_iter() {
        line.clear();
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&value.to_string());
        }
        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;
    Ok(())
}

impl RasterFile {
    /// Render the ASCII grid into a string.
    pub fn to_ascii_grid(&self) -> NimrodResult<String> {
        let mut out = Vec::new();
        write_ascii_grid(self, &mut out)?;
        // Only ASCII is ever written
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Write the ASCII grid to `path`.
    pub fn save_ascii_grid<P: AsRef<Path>>(&self, path: P) -> NimrodResult<()> {
        let path = path.as_ref();
        write_ascii_grid(self, BufWriter::new(File::create(path)?))?;
        info!(
            path = %path.display(),
            rows = self.rows(),
            cols = self.cols(),
            "Written ASCII grid"
        );
        Ok(())
    }
}
