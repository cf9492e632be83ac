//! Batch decoding with structured per-file outcomes.
//!
//! A failure in one file never stops the batch; each outcome carries the
//! error so callers can decide what to report.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nimrod_common::{timestamp_from_filename, BoundingBox};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::NimrodResult;
use crate::raster::RasterFile;

/// Result of decoding (and optionally clipping) one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Acquisition time taken from the filename, if it carries one
    pub timestamp: Option<DateTime<Utc>>,
    pub result: NimrodResult<RasterFile>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn raster(&self) -> Option<&RasterFile> {
        self.result.as_ref().ok()
    }

    /// Grid sample for time-series aggregation, if decoding succeeded.
    pub fn grid_sample(&self) -> Option<GridSample> {
        self.raster().map(|r| r.to_grid_sample(self.timestamp))
    }
}

/// A decoded grid with its coordinate axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSample {
    pub timestamp: Option<DateTime<Utc>>,
    pub rows: usize,
    pub cols: usize,
    /// Row-major values, northernmost row first
    pub data: Vec<i16>,
    /// Column centres, west to east
    pub x_coordinates: Vec<f64>,
    /// Row centres, south to north
    pub y_coordinates: Vec<f64>,
}

impl RasterFile {
    pub fn to_grid_sample(&self, timestamp: Option<DateTime<Utc>>) -> GridSample {
        let geometry = self.geometry();
        GridSample {
            timestamp,
            rows: geometry.rows,
            cols: geometry.cols,
            data: self.data().to_vec(),
            x_coordinates: geometry.x_coordinates(),
            y_coordinates: geometry.y_coordinates(),
        }
    }
}

/// Decode one file and clip it to `bbox` if given.
pub fn decode_file(path: &Path, bbox: Option<&BoundingBox>) -> FileOutcome {
    let timestamp = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| timestamp_from_filename(name).ok());

    let result = RasterFile::open(path).and_then(|raster| match bbox {
        Some(bbox) => raster.clip(bbox),
        None => Ok(raster),
    });

    match &result {
        Ok(raster) => debug!(
            path = %path.display(),
            rows = raster.rows(),
            cols = raster.cols(),
            "Decoded file"
        ),
        Err(e) => warn!(
            path = %path.display(),
            kind = e.kind(),
            error = %e,
            "Failed to decode file"
        ),
    }

    FileOutcome {
        path: path.to_path_buf(),
        timestamp,
        result,
    }
}

/// Decode many files in parallel. Outcomes keep the order of `paths`.
pub fn decode_batch(paths: &[PathBuf], bbox: Option<&BoundingBox>) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| decode_file(path, bbox))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Failed,
}

/// Serializable summary line for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&FileOutcome> for FileSummary {
    fn from(outcome: &FileOutcome) -> Self {
        let path = outcome.path.display().to_string();
        match &outcome.result {
            Ok(raster) => Self {
                path,
                timestamp: outcome.timestamp,
                status: FileStatus::Ok,
                rows: Some(raster.rows()),
                cols: Some(raster.cols()),
                error_kind: None,
                error: None,
            },
            Err(e) => Self {
                path,
                timestamp: outcome.timestamp,
                status: FileStatus::Failed,
                rows: None,
                cols: None,
                error_kind: Some(e.kind()),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Counts and per-file lines for a whole batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<FileSummary>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let files: Vec<FileSummary> = outcomes.iter().map(FileSummary::from).collect();
        let succeeded = files
            .iter()
            .filter(|f| f.status == FileStatus::Ok)
            .count();

        Self {
            total: files.len(),
            succeeded,
            failed: files.len() - succeeded,
            files,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileSummary> {
        self.files.iter().filter(|f| f.status == FileStatus::Failed)
    }
}
