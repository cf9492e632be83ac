//! Decoded NIMROD raster file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use nimrod_common::RasterGeometry;
use tracing::{debug, info};

use crate::error::NimrodResult;
use crate::header::Header;
use crate::payload::{read_payload, write_payload};

/// A fully decoded NIMROD record stream: header plus raster values.
///
/// Only ever constructed from a complete, well-formed stream (or by
/// clipping another `RasterFile`), so `data().len() == rows() * cols()`
/// always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterFile {
    header: Header,
    data: Vec<i16>,
}

impl RasterFile {
    /// Open and decode a NIMROD file.
    pub fn open<P: AsRef<Path>>(path: P) -> NimrodResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), "Decoding NIMROD file");
        Self::from_reader(BufReader::new(file))
    }

    /// Decode one record stream.
    ///
    /// The reader is taken by value and dropped on return, whether decoding
    /// succeeded or not.
    pub fn from_reader<R: Read>(mut reader: R) -> NimrodResult<Self> {
        let header = Header::read_from(&mut reader)?;
        let data = read_payload(&mut reader, header.rows(), header.cols())?;
        Ok(Self { header, data })
    }

    /// Decode a record stream held in memory.
    pub fn from_bytes(bytes: &[u8]) -> NimrodResult<Self> {
        Self::from_reader(bytes)
    }

    pub(crate) fn from_parts(header: Header, data: Vec<i16>) -> Self {
        debug_assert_eq!(data.len(), header.rows() * header.cols());
        Self { header, data }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Raster values, row-major, northernmost row first.
    pub fn data(&self) -> &[i16] {
        &self.data
    }

    pub fn into_data(self) -> Vec<i16> {
        self.data
    }

    pub fn geometry(&self) -> RasterGeometry {
        self.header.geometry()
    }

    pub fn rows(&self) -> usize {
        self.header.rows()
    }

    pub fn cols(&self) -> usize {
        self.header.cols()
    }

    pub fn x_left(&self) -> f64 {
        self.geometry().x_left
    }

    pub fn x_right(&self) -> f64 {
        self.geometry().x_right()
    }

    pub fn y_top(&self) -> f64 {
        self.geometry().y_top
    }

    pub fn y_bottom(&self) -> f64 {
        self.geometry().y_bottom()
    }

    pub fn x_pixel_size(&self) -> f64 {
        self.geometry().x_pixel_size
    }

    pub fn y_pixel_size(&self) -> f64 {
        self.geometry().y_pixel_size
    }

    /// Value at a row (from north) and column (from west).
    pub fn value_at(&self, row: usize, col: usize) -> Option<i16> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.data.get(row * self.cols() + col).copied()
    }

    /// One row of values.
    pub fn row(&self, row: usize) -> Option<&[i16]> {
        self.data.chunks_exact(self.cols()).nth(row)
    }

    /// Iterate rows from north to south.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[i16]> {
        self.data.chunks_exact(self.cols())
    }

    /// Re-encode as a NIMROD record stream.
    pub fn write_nimrod<W: Write>(&self, mut writer: W) -> NimrodResult<()> {
        self.header.write_to(&mut writer)?;
        write_payload(&mut writer, &self.data)?;
        writer.flush()?;
        Ok(())
    }

    /// Re-encode to a NIMROD file at `path`.
    pub fn save_nimrod<P: AsRef<Path>>(&self, path: P) -> NimrodResult<()> {
        let path = path.as_ref();
        self.write_nimrod(BufWriter::new(File::create(path)?))?;
        info!(
            path = %path.display(),
            rows = self.rows(),
            cols = self.cols(),
            "Written NIMROD file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NimrodError;
    use crate::header::element;
    use test_utils::NimrodBuilder;

    #[test]
    fn test_minimal_file() {
        let bytes = NimrodBuilder::minimal().build();
        let raster = RasterFile::from_bytes(&bytes).unwrap();

        assert_eq!(raster.rows(), 2);
        assert_eq!(raster.cols(), 3);
        assert_eq!(raster.x_left(), 0.0);
        assert_eq!(raster.x_right(), 2000.0);
        assert_eq!(raster.y_top(), 6000.0);
        assert_eq!(raster.y_bottom(), 5000.0);
        assert_eq!(raster.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_row_access() {
        let raster = RasterFile::from_bytes(&NimrodBuilder::minimal().build()).unwrap();

        assert_eq!(raster.row(0), Some(&[1, 2, 3][..]));
        assert_eq!(raster.row(1), Some(&[4, 5, 6][..]));
        assert_eq!(raster.row(2), None);
        assert_eq!(raster.value_at(1, 0), Some(4));
        assert_eq!(raster.value_at(0, 3), None);
        assert_eq!(raster.rows_iter().count(), 2);
    }

    #[test]
    fn test_header_mirrors_geometry() {
        let raster = RasterFile::from_bytes(&NimrodBuilder::minimal().build()).unwrap();
        let header = raster.header();

        assert_eq!(header.int(element::ROWS), Some(2));
        assert_eq!(header.int(element::COLS), Some(3));
        assert_eq!(header.real(element::Y_TOP), Some(6000.0));
        assert_eq!(header.real(element::X_LEFT), Some(0.0));
    }

    #[test]
    fn test_reencode_is_byte_exact() {
        let bytes = NimrodBuilder::minimal().build();
        let raster = RasterFile::from_bytes(&bytes).unwrap();

        let mut out = Vec::new();
        raster.write_nimrod(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut bytes = NimrodBuilder::minimal().build();
        bytes.extend_from_slice(&[0xDE, 0xAD]);
        assert!(RasterFile::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_open_missing_file() {
        let err = RasterFile::open("/nonexistent/nimrod.dat").unwrap_err();
        assert!(matches!(err, NimrodError::Io(_)));
    }
}
