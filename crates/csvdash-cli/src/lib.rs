//! Shared CLI definitions for csvdash.
//!
//! Used by the main application and by the build script (manpage).

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Compression format for CSV sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Gzip compression (.gz)
    Gzip,
    /// Zstandard compression (.zst)
    Zstd,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// XZ compression (.xz)
    Xz,
}

impl CompressionFormat {
    /// Detect compression format from the final extension of a path or URL
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        match ext.to_lowercase().as_str() {
            "gz" => Some(Self::Gzip),
            "zst" | "zstd" => Some(Self::Zstd),
            "bz2" | "bz" => Some(Self::Bzip2),
            "xz" => Some(Self::Xz),
            _ => None,
        }
    }
}

/// Image format used when exporting charts
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ExportFormat {
    /// Portable Network Graphics (bitmap)
    #[default]
    Png,
    /// Scalable Vector Graphics
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// Parse a format name as used in the config file ("png", "svg"; case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

/// An ad-hoc dataset given on the command line as `KEY=SOURCE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetArg {
    pub key: String,
    pub source: String,
}

/// Value parser for `--dataset`. The first `=` separates key from source.
pub fn parse_dataset_arg(s: &str) -> Result<DatasetArg, String> {
    let (key, source) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=SOURCE, got '{}'", s))?;
    let key = key.trim();
    let source = source.trim();
    if key.is_empty() {
        return Err("dataset key must not be empty".to_string());
    }
    if key == "all" {
        return Err("'all' is reserved for the cross-dataset view".to_string());
    }
    if source.is_empty() {
        return Err(format!("dataset '{}' has an empty source", key));
    }
    Ok(DatasetArg {
        key: key.to_string(),
        source: source.to_string(),
    })
}

/// Command-line arguments for csvdash
#[derive(Clone, Parser, Debug)]
#[command(
    name = "csvdash",
    version,
    about = "CSV Dashboards in the Terminal",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    /// Read the dataset registry and settings from this file instead of the default config location
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Add an ad-hoc dataset (local path or http(s) URL) shown as a table of all its columns. Repeatable.
    #[arg(long = "dataset", value_name = "KEY=SOURCE", value_parser = parse_dataset_arg)]
    pub datasets: Vec<DatasetArg>,

    /// Load every dataset at startup instead of waiting for a load key press
    #[arg(long = "load-all", action)]
    pub load_all: bool,

    /// Rows per table page (overrides config [display] page_size for tables without their own)
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Headless mode: load all datasets, write every chart into DIR, then exit
    #[arg(long = "export", value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Image format for --export and the in-app export key (default: png)
    #[arg(long = "export-format", value_enum)]
    pub export_format: Option<ExportFormat>,

    /// Enable debug mode (debug-level logging and an event counter line)
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Clear all cache data (log files) and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,

    /// Generate default configuration file at ~/.config/csvdash/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}
