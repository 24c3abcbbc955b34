//! Tracing setup. The TUI owns the terminal, so interactive runs log to a file in
//! the cache directory; headless runs log to stderr.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::cache::CacheManager;

/// `RUST_LOG` when set, otherwise info (debug with `--debug`) for this crate.
pub fn env_filter(debug: bool) -> EnvFilter {
    let default_level = if debug {
        "warn,csvdash=debug"
    } else {
        "warn,csvdash=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Append log lines to the cache log file. Returns the file's path.
pub fn init_file_logging(cache: &CacheManager, debug: bool) -> Result<PathBuf> {
    cache.ensure_cache_dir()?;
    let path = cache.log_file();
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("Could not initialize logging: {}", e))?;
    Ok(path)
}

pub fn init_stderr_logging(debug: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| eyre!("Could not initialize logging: {}", e))
}
