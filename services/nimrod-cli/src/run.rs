//! Single-file and directory runs.

use anyhow::{bail, Context, Result};
use nimrod_parser::{decode_batch, decode_file, BatchSummary, RasterFile};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Settings;

/// Decode, clip, report and write one file. Errors abort the run.
pub fn run_file(input: &Path, settings: &Settings) -> Result<()> {
    let outcome = decode_file(input, settings.bbox.as_ref());
    let raster = outcome
        .result
        .with_context(|| format!("Failed to process {}", input.display()))?;

    if settings.query {
        println!("{}", raster.report());
    }

    write_outputs(input, &raster, settings)?;
    Ok(())
}

/// Decode every matching file under `dir`. Failed files are reported in the
/// summary; the run fails only after all files have been attempted.
pub fn run_directory(dir: &Path, settings: &Settings) -> Result<BatchSummary> {
    let paths = collect_input_files(dir, &settings.extension, settings.output_dir.as_deref())?;
    if paths.is_empty() {
        bail!(
            "No *.{} files found in {}",
            settings.extension,
            dir.display()
        );
    }

    info!(count = paths.len(), dir = %dir.display(), "Decoding batch");
    let outcomes = decode_batch(&paths, settings.bbox.as_ref());

    let mut write_failures = 0;
    for outcome in &outcomes {
        let Some(raster) = outcome.raster() else {
            continue;
        };
        if settings.query {
            println!("== {} ==", outcome.path.display());
            println!("{}", raster.report());
        }
        if let Err(e) = write_outputs(&outcome.path, raster, settings) {
            warn!(file = %outcome.path.display(), error = %e, "Failed to write outputs");
            write_failures += 1;
        }
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Batch complete"
    );
    for failure in summary.failures() {
        warn!(
            file = %failure.path,
            kind = failure.error_kind.unwrap_or("unknown"),
            "{}",
            failure.error.as_deref().unwrap_or("")
        );
    }

    if let Some(path) = &settings.summary {
        write_summary(path, &summary)?;
    }

    if write_failures > 0 {
        bail!("{} file(s) could not be written", write_failures);
    }
    Ok(summary)
}

/// Suffix of re-encoded NIMROD outputs. Never picked up as input.
pub const NIMROD_OUTPUT_SUFFIX: &str = "clip.nimrod";

/// Files under `dir` whose name ends in `.<extension>`, sorted by path.
///
/// Our own NIMROD outputs and anything under `exclude` (the output
/// directory, when it sits inside `dir`) are skipped.
pub fn collect_input_files(
    dir: &Path,
    extension: &str,
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", extension);
    let output_suffix = format!(".{}", NIMROD_OUTPUT_SUFFIX);
    let exclude = exclude.and_then(|path| path.canonicalize().ok());
    let mut paths = Vec::new();

    let walker = WalkDir::new(dir).into_iter().filter_entry(|entry| {
        match (&exclude, entry.path().canonicalize()) {
            (Some(excluded), Ok(path)) => path != *excluded,
            _ => true,
        }
    });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(&suffix) && !name.ends_with(&output_suffix));
        if matches {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    Ok(paths)
}

fn write_outputs(input: &Path, raster: &RasterFile, settings: &Settings) -> Result<()> {
    if !settings.writes_output() {
        return Ok(());
    }

    let dir = output_dir(input, settings);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    if settings.write_ascii {
        let path = output_path(&dir, input, "asc");
        raster
            .save_ascii_grid(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote ASCII grid");
    }

    if settings.write_nimrod {
        let path = output_path(&dir, input, NIMROD_OUTPUT_SUFFIX);
        raster
            .save_nimrod(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote NIMROD file");
    }

    Ok(())
}

fn output_dir(input: &Path, settings: &Settings) -> PathBuf {
    match &settings.output_dir {
        Some(dir) => dir.clone(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// `<dir>/<input stem>.<suffix>`
pub fn output_path(dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("nimrod");
    dir.join(format!("{}.{}", stem, suffix))
}

fn write_summary(path: &Path, summary: &BatchSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write summary {}", path.display()))?;
    info!(path = %path.display(), "Wrote batch summary");
    Ok(())
}
