//! NIMROD header decoding.
//!
//! The 512-byte header is five contiguous big-endian blocks:
//!
//! | Elements | Count | Type                 | Content                 |
//! |----------|-------|----------------------|-------------------------|
//! | 1-31     | 31    | `i16`                | general integers        |
//! | 32-59    | 28    | `f32`                | general reals           |
//! | 60-104   | 45    | `f32`                | data specific reals     |
//! | 105-107  | 56    | bytes (not swapped)  | units, source, title    |
//! | 108-158  | 51    | `i16`                | data specific integers  |
//!
//! Elements are addressed by their 1-based number from the format
//! documentation; there is no element 0.

use std::fmt;
use std::io::{Read, Write};
use std::ops::{Range, RangeInclusive};

use bytes::{Buf, BufMut};
use nimrod_common::{RasterGeometry, ValidTime};
use tracing::debug;

use crate::error::{NimrodError, NimrodResult};
use crate::record::{check_record_length, write_record_length, RecordLocation};

/// Size of the header record in bytes.
pub const HEADER_LEN: usize = 512;

/// Highest element number in the header.
pub const HEADER_ELEMENT_COUNT: usize = 158;

const GENERAL_INT_COUNT: usize = 31;
const GENERAL_REAL_COUNT: usize = 28;
const SPECIFIC_REAL_COUNT: usize = 45;
const CHARACTER_BLOCK_LEN: usize = 56;
const SPECIFIC_INT_COUNT: usize = 51;

const UNITS_BYTES: Range<usize> = 0..8;
const DATA_SOURCE_BYTES: Range<usize> = 8..32;
// Byte 55 of the character block is not part of any field
const TITLE_BYTES: Range<usize> = 32..55;

/// Element numbers with a fixed meaning.
pub mod element {
    pub const VT_YEAR: usize = 1;
    pub const VT_MONTH: usize = 2;
    pub const VT_DAY: usize = 3;
    pub const VT_HOUR: usize = 4;
    pub const VT_MINUTE: usize = 5;
    pub const ROWS: usize = 16;
    pub const COLS: usize = 17;
    pub const N_SPECIFIC_REALS: usize = 22;
    pub const N_SPECIFIC_INTS: usize = 23;
    pub const Y_TOP: usize = 34;
    pub const Y_PIXEL_SIZE: usize = 35;
    pub const X_LEFT: usize = 36;
    pub const X_PIXEL_SIZE: usize = 37;
    pub const MISSING_DATA: usize = 38;
    pub const UNITS: usize = 105;
    pub const DATA_SOURCE: usize = 106;
    pub const TITLE: usize = 107;
}

/// Element number ranges of each header category.
pub mod category {
    use std::ops::RangeInclusive;

    pub const GENERAL_INTS: RangeInclusive<usize> = 1..=31;
    pub const GENERAL_REALS: RangeInclusive<usize> = 32..=59;
    pub const SPECIFIC_REALS: RangeInclusive<usize> = 60..=104;
    pub const CHARACTERS: RangeInclusive<usize> = 105..=107;
    pub const SPECIFIC_INTS: RangeInclusive<usize> = 108..=158;
}

/// A single decoded header value.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderElement {
    Int(i16),
    Real(f32),
    Text(Vec<u8>),
}

impl HeaderElement {
    pub fn as_int(&self) -> Option<i16> {
        match self {
            HeaderElement::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f32> {
        match self {
            HeaderElement::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            HeaderElement::Text(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderElement::Int(v) => write!(f, "{}", v),
            HeaderElement::Real(v) => write!(f, "{:?}", v),
            HeaderElement::Text(v) => f.write_str(&text_lossy(v)),
        }
    }
}

/// Render a fixed-width character field, dropping trailing padding.
pub fn text_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(|c: char| c == ' ' || c == '\0')
        .to_string()
}

/// Decoded NIMROD header.
///
/// Raster geometry is never stored separately: every accessor derives it
/// from the elements, and [`Header::set_extent`] is the only path that
/// rewrites the geometry elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Elements 1..=158 stored at index `n - 1`
    elements: Vec<HeaderElement>,
    /// Raw character block, kept verbatim for re-encoding
    characters: [u8; CHARACTER_BLOCK_LEN],
}

impl Header {
    /// Read the header record, including both length prefixes.
    pub fn read_from<R: Read>(reader: &mut R) -> NimrodResult<Self> {
        check_record_length(reader, HEADER_LEN as i64, RecordLocation::HeaderStart)?;

        let mut block = [0u8; HEADER_LEN];
        reader
            .read_exact(&mut block)
            .map_err(|e| NimrodError::HeaderRead(format!("short header block: {}", e)))?;
        let header = Self::decode(&block)?;

        check_record_length(reader, HEADER_LEN as i64, RecordLocation::HeaderEnd)?;
        Ok(header)
    }

    /// Decode a bare 512-byte header block.
    pub fn decode(block: &[u8]) -> NimrodResult<Self> {
        if block.len() != HEADER_LEN {
            return Err(NimrodError::HeaderRead(format!(
                "header block is {} bytes, expected {}",
                block.len(),
                HEADER_LEN
            )));
        }

        let mut buf = block;
        let mut elements = Vec::with_capacity(HEADER_ELEMENT_COUNT);

        elements.extend((0..GENERAL_INT_COUNT).map(|_| HeaderElement::Int(buf.get_i16())));
        elements.extend((0..GENERAL_REAL_COUNT).map(|_| HeaderElement::Real(buf.get_f32())));
        elements.extend((0..SPECIFIC_REAL_COUNT).map(|_| HeaderElement::Real(buf.get_f32())));

        let mut characters = [0u8; CHARACTER_BLOCK_LEN];
        buf.copy_to_slice(&mut characters);
        elements.push(HeaderElement::Text(characters[UNITS_BYTES].to_vec()));
        elements.push(HeaderElement::Text(characters[DATA_SOURCE_BYTES].to_vec()));
        elements.push(HeaderElement::Text(characters[TITLE_BYTES].to_vec()));

        elements.extend((0..SPECIFIC_INT_COUNT).map(|_| HeaderElement::Int(buf.get_i16())));
        debug_assert!(!buf.has_remaining());

        let header = Self {
            elements,
            characters,
        };

        let (rows, cols) = (header.raw_int(element::ROWS), header.raw_int(element::COLS));
        if rows <= 0 || cols <= 0 {
            return Err(NimrodError::HeaderRead(format!(
                "invalid raster dimensions {} rows x {} cols",
                rows, cols
            )));
        }

        debug!(
            rows,
            cols,
            title = %text_lossy(header.title()),
            "Decoded NIMROD header"
        );

        Ok(header)
    }

    /// Encode the bare 512-byte header block.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN);
        for (number, value) in self.elements() {
            match value {
                HeaderElement::Int(v) => buf.put_i16(*v),
                HeaderElement::Real(v) => buf.put_f32(*v),
                HeaderElement::Text(_) if number == element::UNITS => {
                    buf.put_slice(&self.characters)
                }
                HeaderElement::Text(_) => {}
            }
        }
        buf
    }

    /// Write the header record with both length prefixes.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> NimrodResult<()> {
        write_record_length(writer, HEADER_LEN as i64)?;
        writer.write_all(&self.encode())?;
        write_record_length(writer, HEADER_LEN as i64)?;
        Ok(())
    }

    /// Element by its 1-based number.
    pub fn element(&self, number: usize) -> Option<&HeaderElement> {
        number.checked_sub(1).and_then(|i| self.elements.get(i))
    }

    /// Integer element by number; `None` if out of range or not an integer.
    pub fn int(&self, number: usize) -> Option<i16> {
        self.element(number).and_then(HeaderElement::as_int)
    }

    /// Real element by number; `None` if out of range or not a real.
    pub fn real(&self, number: usize) -> Option<f32> {
        self.element(number).and_then(HeaderElement::as_real)
    }

    /// Character element by number.
    pub fn text(&self, number: usize) -> Option<&[u8]> {
        self.element(number).and_then(HeaderElement::as_text)
    }

    /// All elements paired with their numbers.
    pub fn elements(&self) -> impl Iterator<Item = (usize, &HeaderElement)> {
        self.elements.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    /// Elements within an inclusive number range, clipped to the header.
    pub fn elements_in(
        &self,
        range: RangeInclusive<usize>,
    ) -> impl Iterator<Item = (usize, &HeaderElement)> {
        self.elements().filter(move |(n, _)| range.contains(n))
    }

    pub fn rows(&self) -> usize {
        self.raw_int(element::ROWS).max(0) as usize
    }

    pub fn cols(&self) -> usize {
        self.raw_int(element::COLS).max(0) as usize
    }

    /// Raster geometry derived from elements 16, 17 and 34-37.
    pub fn geometry(&self) -> RasterGeometry {
        RasterGeometry::new(
            self.rows(),
            self.cols(),
            self.raw_real(element::Y_TOP),
            self.raw_real(element::Y_PIXEL_SIZE),
            self.raw_real(element::X_LEFT),
            self.raw_real(element::X_PIXEL_SIZE),
        )
    }

    /// Validity time from elements 1-5.
    pub fn valid_time(&self) -> ValidTime {
        ValidTime::new(
            self.raw_int(element::VT_YEAR),
            self.raw_int(element::VT_MONTH),
            self.raw_int(element::VT_DAY),
            self.raw_int(element::VT_HOUR),
            self.raw_int(element::VT_MINUTE),
        )
    }

    /// Missing data sentinel (element 38).
    pub fn missing_data_value(&self) -> f32 {
        self.real(element::MISSING_DATA).unwrap_or_default()
    }

    pub fn units(&self) -> &[u8] {
        &self.characters[UNITS_BYTES]
    }

    pub fn data_source(&self) -> &[u8] {
        &self.characters[DATA_SOURCE_BYTES]
    }

    pub fn title(&self) -> &[u8] {
        &self.characters[TITLE_BYTES]
    }

    /// Number of data specific reals in use (element 22).
    pub fn n_data_specific_reals(&self) -> usize {
        usize::try_from(self.raw_int(element::N_SPECIFIC_REALS))
            .unwrap_or(0)
            .min(SPECIFIC_REAL_COUNT)
    }

    /// Number of data specific integers in use.
    ///
    /// Element 23 counts from element 109, so element 108 is added.
    pub fn n_data_specific_ints(&self) -> usize {
        usize::try_from(i32::from(self.raw_int(element::N_SPECIFIC_INTS)) + 1)
            .unwrap_or(0)
            .min(SPECIFIC_INT_COUNT)
    }

    /// Rewrite the raster extent: rows, cols, and the first row/column centres.
    ///
    /// Pixel sizes are unchanged. The origin is stored back as `f32`, so on
    /// grids with fractional pixel sizes a clip of a clip can place `x_left`
    /// and `y_top` one `f32` ulp away from the equivalent direct clip. The
    /// selected rows, columns and data are the same.
    pub(crate) fn set_extent(&mut self, rows: usize, cols: usize, y_top: f64, x_left: f64) {
        debug_assert!(rows > 0 && rows <= self.rows());
        debug_assert!(cols > 0 && cols <= self.cols());

        // Narrowing only, so the counts still fit the original i16 fields
        self.set(element::ROWS, HeaderElement::Int(rows as i16));
        self.set(element::COLS, HeaderElement::Int(cols as i16));
        self.set(element::Y_TOP, HeaderElement::Real(y_top as f32));
        self.set(element::X_LEFT, HeaderElement::Real(x_left as f32));
    }

    fn set(&mut self, number: usize, value: HeaderElement) {
        self.elements[number - 1] = value;
    }

    fn raw_int(&self, number: usize) -> i16 {
        self.int(number).unwrap_or_default()
    }

    fn raw_real(&self, number: usize) -> f64 {
        f64::from(self.real(number).unwrap_or_default())
    }
}
