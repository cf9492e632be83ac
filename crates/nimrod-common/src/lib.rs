//! Common types shared by the NIMROD parser and its command-line front end.

pub mod bbox;
pub mod grid;
pub mod time;

pub use bbox::{BboxParseError, BoundingBox};
pub use grid::RasterGeometry;
pub use time::{timestamp_from_filename, TimeParseError, ValidTime};
