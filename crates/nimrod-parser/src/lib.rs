//! NIMROD parser for Met Office radar composites.
//!
//! This crate decodes the fixed-layout NIMROD record stream (a 512-byte
//! header and a big-endian `i16` raster, each framed by record length
//! prefixes), clips rasters to a bounding box, and writes them back out as
//! NIMROD or as an ASCII grid.
//!
//! # Example
//!
//! ```no_run
//! use nimrod_common::BoundingBox;
//! use nimrod_parser::RasterFile;
//!
//! let raster = RasterFile::open("radar_uk_202306201200_1km-composite.dat")?;
//! let clipped = raster.clip(&BoundingBox::from_extent(355000.0, 440000.0, 534000.0, 609000.0))?;
//! println!("{}", clipped.report());
//! clipped.save_ascii_grid("clipped.asc")?;
//! # Ok::<(), nimrod_parser::NimrodError>(())
//! ```

pub mod ascii;
pub mod batch;
pub mod clip;
pub mod error;
pub mod header;
pub mod payload;
pub mod raster;
pub mod record;
pub mod report;

pub use ascii::write_ascii_grid;
pub use batch::{decode_batch, decode_file, BatchSummary, FileOutcome, FileStatus, FileSummary, GridSample};
pub use clip::{pixel_window, PixelWindow};
pub use error::{NimrodError, NimrodResult};
pub use header::{Header, HeaderElement, HEADER_ELEMENT_COUNT, HEADER_LEN};
pub use raster::RasterFile;
pub use record::{check_record_length, RecordLocation};
pub use report::HeaderReport;
