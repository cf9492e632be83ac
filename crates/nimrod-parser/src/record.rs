//! Record length framing.
//!
//! NIMROD files are written as Fortran unformatted sequential records: every
//! record is preceded and followed by a 4-byte big-endian signed length. A
//! file holds two records, the 512-byte header and the raster payload, and
//! all four lengths around them are checked.

use std::fmt;
use std::io::{self, Read, Write};

use crate::error::{NimrodError, NimrodResult};

/// Position of a record length prefix within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLocation {
    HeaderStart,
    HeaderEnd,
    DataStart,
    DataEnd,
}

impl RecordLocation {
    /// Error reported when the prefix itself cannot be read.
    fn short_read(self, err: io::Error) -> NimrodError {
        let message = format!("failed to read record length at {}: {}", self, err);
        match self {
            RecordLocation::HeaderStart | RecordLocation::HeaderEnd => {
                NimrodError::HeaderRead(message)
            }
            RecordLocation::DataStart | RecordLocation::DataEnd => {
                NimrodError::PayloadRead(message)
            }
        }
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            RecordLocation::HeaderStart => "header start",
            RecordLocation::HeaderEnd => "header end",
            RecordLocation::DataStart => "data start",
            RecordLocation::DataEnd => "data end",
        };
        f.write_str(tag)
    }
}

/// Consume a 4-byte length prefix and check it equals `expected`.
///
/// Purely structural: nothing but the prefix is read.
pub fn check_record_length<R: Read>(
    reader: &mut R,
    expected: i64,
    location: RecordLocation,
) -> NimrodResult<()> {
    let mut prefix = [0u8; 4];
    reader
        .read_exact(&mut prefix)
        .map_err(|e| location.short_read(e))?;

    let actual = i64::from(i32::from_be_bytes(prefix));
    if actual != expected {
        return Err(NimrodError::RecordLength {
            actual,
            expected,
            location,
        });
    }

    Ok(())
}

/// Write a 4-byte big-endian length prefix.
pub fn write_record_length<W: Write>(writer: &mut W, length: i64) -> NimrodResult<()> {
    let length = i32::try_from(length).map_err(|_| {
        NimrodError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("record length {} does not fit in 32 bits", length),
        ))
    })?;
    writer.write_all(&length.to_be_bytes())?;
    Ok(())
}
