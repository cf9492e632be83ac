//! NIMROD radar composite tool.
//!
//! Decodes a single NIMROD file or a directory of them, optionally clips to
//! a bounding box, prints the header report and writes ASCII grid and
//! NIMROD outputs.

mod config;
mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Overrides, RunConfig, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "nimrod")]
#[command(about = "Decode, clip and extract Met Office NIMROD radar composites")]
struct Args {
    /// NIMROD file, or a directory to scan for files
    input: PathBuf,

    /// Clip box in raster coordinates: "xmin,xmax,ymin,ymax"
    #[arg(short, long, allow_hyphen_values = true)]
    bbox: Option<String>,

    /// Print the header report
    #[arg(short, long)]
    query: bool,

    /// Write an ASCII grid (<stem>.asc) per input
    #[arg(short, long)]
    ascii: bool,

    /// Write the (clipped) raster back out as NIMROD (<stem>.clip.nimrod)
    #[arg(short, long)]
    nimrod: bool,

    /// Output directory (default: next to each input)
    #[arg(short, long, env = "NIMROD_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// YAML run configuration
    #[arg(short, long, env = "NIMROD_CONFIG")]
    config: Option<PathBuf>,

    /// Input file suffix when scanning a directory
    #[arg(long)]
    extension: Option<String>,

    /// Worker threads for directory runs
    #[arg(short, long)]
    threads: Option<usize>,

    /// Write a JSON batch summary to this path (directory runs)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, env = "NIMROD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level, args.log_format);

    let config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading run configuration");
            RunConfig::from_yaml(path)?
        }
        None => RunConfig::default(),
    };

    let settings = Settings::resolve(
        config,
        Overrides {
            bbox: args.bbox,
            output_dir: args.output_dir,
            threads: args.threads,
            extension: args.extension,
            write_ascii: args.ascii,
            write_nimrod: args.nimrod,
            query: args.query,
            summary: args.summary,
        },
    )?;

    if let Some(threads) = settings.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    if args.input.is_dir() {
        let summary = run::run_directory(&args.input, &settings)?;
        if summary.failed > 0 {
            anyhow::bail!("{} of {} files failed to decode", summary.failed, summary.total);
        }
    } else {
        run::run_file(&args.input, &settings)?;
    }

    Ok(())
}
