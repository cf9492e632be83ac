//! Raster payload decoding and encoding.
//!
//! The payload is one record of `rows * cols` big-endian `i16` values in
//! row-major order, northernmost row first.

use std::io::{Read, Write};

use bytes::{Buf, BufMut};
use tracing::debug;

use crate::error::{NimrodError, NimrodResult};
use crate::record::{check_record_length, write_record_length, RecordLocation};

/// Byte length of the payload record for a raster of `cells` values.
pub fn payload_record_length(cells: usize) -> i64 {
    cells as i64 * 2
}

/// Read the payload record, including both length prefixes.
pub fn read_payload<R: Read>(reader: &mut R, rows: usize, cols: usize) -> NimrodResult<Vec<i16>> {
    let cells = rows * cols;
    let record_len = payload_record_length(cells);

    check_record_length(reader, record_len, RecordLocation::DataStart)?;

    let mut raw = Vec::new();
    reader
        .by_ref()
        .take(record_len as u64)
        .read_to_end(&mut raw)
        .map_err(|e| NimrodError::PayloadRead(format!("failed to read raster data: {}", e)))?;
    let data = decode_payload(&raw, cells)?;

    check_record_length(reader, record_len, RecordLocation::DataEnd)?;

    debug!(rows, cols, "Decoded raster payload");
    Ok(data)
}

/// Decode exactly `cells` big-endian `i16` values from `raw`.
pub fn decode_payload(raw: &[u8], cells: usize) -> NimrodResult<Vec<i16>> {
    if raw.len() != cells * 2 {
        return Err(NimrodError::PayloadRead(format!(
            "raster data is {} bytes, expected {} ({} values)",
            raw.len(),
            cells * 2,
            cells
        )));
    }

    let mut buf = raw;
    Ok((0..cells).map(|_| buf.get_i16()).collect())
}

/// Encode values as big-endian `i16`, without framing.
pub fn encode_payload(data: &[i16]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(data.len() * 2);
    for value in data {
        buf.put_i16(*value);
    }
    buf
}

/// Write the payload record with both length prefixes.
pub fn write_payload<W: Write>(writer: &mut W, data: &[i16]) -> NimrodResult<()> {
    let record_len = payload_record_length(data.len());
    write_record_length(writer, record_len)?;
    writer.write_all(&encode_payload(data))?;
    write_record_length(writer, record_len)?;
    Ok(())
}
