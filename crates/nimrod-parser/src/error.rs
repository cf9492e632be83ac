//! Error types for NIMROD decoding and processing.

use nimrod_common::BoundingBox;
use thiserror::Error;

use crate::record::RecordLocation;

/// Result type for NIMROD parser operations.
pub type NimrodResult<T> = Result<T, NimrodError>;

/// Error types for NIMROD decoding, clipping and output.
///
/// Every variant is terminal for the operation that raised it.
#[derive(Error, Debug)]
pub enum NimrodError {
    /// Header bytes or a header length prefix could not be read
    #[error("Header read error: {0}")]
    HeaderRead(String),

    /// A record length prefix was present but did not match
    #[error("Incorrect record length {actual} bytes (expected {expected}) at {location}")]
    RecordLength {
        actual: i64,
        expected: i64,
        location: RecordLocation,
    },

    /// Raster body was short or malformed
    #[error("Payload read error: {0}")]
    PayloadRead(String),

    /// Clip box does not intersect the raster
    #[error("Bounding box ({requested}) not within raster image ({extent})")]
    BboxRange {
        requested: BoundingBox,
        extent: BoundingBox,
    },

    /// File I/O error outside of record decoding (open, write)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NimrodError {
    /// Stable machine-readable tag for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            NimrodError::HeaderRead(_) => "header_read",
            NimrodError::RecordLength { .. } => "record_length",
            NimrodError::PayloadRead(_) => "payload_read",
            NimrodError::BboxRange { .. } => "bbox_range",
            NimrodError::Io(_) => "io",
        }
    }

    /// Whether the error was raised while decoding the record stream.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            NimrodError::HeaderRead(_)
                | NimrodError::RecordLength { .. }
                | NimrodError::PayloadRead(_)
        )
    }
}
