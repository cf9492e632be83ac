//! Run configuration.
//!
//! An optional YAML file supplies defaults; command-line flags override
//! whatever it sets.

use anyhow::{Context, Result};
use nimrod_common::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_extension() -> String {
    "dat".to_string()
}

/// Contents of a YAML run configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Clip box as `"xmin,xmax,ymin,ymax"`
    #[serde(default)]
    pub bbox: Option<String>,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Worker threads for batch decoding (default: rayon's choice)
    #[serde(default)]
    pub threads: Option<usize>,

    /// Input file suffix picked up when scanning a directory
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default)]
    pub write_ascii: bool,

    #[serde(default)]
    pub write_nimrod: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bbox: None,
            output_dir: None,
            threads: None,
            extension: default_extension(),
            write_ascii: false,
            write_nimrod: false,
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Values given on the command line. `None`/`false` defers to the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bbox: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub threads: Option<usize>,
    pub extension: Option<String>,
    pub write_ascii: bool,
    pub write_nimrod: bool,
    pub query: bool,
    pub summary: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bbox: Option<BoundingBox>,
    pub output_dir: Option<PathBuf>,
    pub threads: Option<usize>,
    pub extension: String,
    pub write_ascii: bool,
    pub write_nimrod: bool,
    pub query: bool,
    pub summary: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(config: RunConfig, overrides: Overrides) -> Result<Self> {
        let bbox = match overrides.bbox.or(config.bbox) {
            Some(text) => Some(
                BoundingBox::from_extent_string(&text)
                    .with_context(|| format!("Invalid bounding box '{}'", text))?,
            ),
            None => None,
        };

        let extension = overrides.extension.unwrap_or(config.extension);

        Ok(Self {
            bbox,
            output_dir: overrides.output_dir.or(config.output_dir),
            threads: overrides.threads.or(config.threads),
            extension: extension.trim_start_matches('.').to_string(),
            write_ascii: overrides.write_ascii || config.write_ascii,
            write_nimrod: overrides.write_nimrod || config.write_nimrod,
            query: overrides.query,
            summary: overrides.summary,
        })
    }

    pub fn writes_output(&self) -> bool {
        self.write_ascii || self.write_nimrod
    }
}
