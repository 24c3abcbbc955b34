//! Fetching dataset sources: local paths or http(s) URLs, optionally compressed.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::record::{parse_csv, Record};
use csvdash_cli::CompressionFormat;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputSource {
    Local(PathBuf),
    Http(String),
}

/// Classifies a source string as a local path or an http(s) URL, without touching
/// the filesystem.
pub fn input_source(source: &str) -> InputSource {
    if let Some(i) = source.find("://") {
        let scheme = source[..i].to_lowercase();
        if scheme == "http" || scheme == "https" {
            return InputSource::Http(source.to_string());
        }
    }
    InputSource::Local(PathBuf::from(source))
}

/// Compression implied by the source's final extension. For URLs only the path
/// counts; query string and fragment are ignored.
pub fn source_compression(source: &str) -> Option<CompressionFormat> {
    let path = match input_source(source) {
        InputSource::Local(path) => path,
        InputSource::Http(url) => {
            let without_query = url.split(['?', '#']).next().unwrap_or_default();
            PathBuf::from(without_query)
        }
    };
    CompressionFormat::from_extension(&path)
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Timeout for http(s) requests
    pub timeout: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Raw bytes of a source, decompressed when its extension says so.
pub fn fetch_source(source: &str, options: &LoadOptions) -> Result<Vec<u8>> {
    let reader: Box<dyn Read> = match input_source(source) {
        InputSource::Local(path) => Box::new(BufReader::new(open_local(&path)?)),
        InputSource::Http(url) => Box::new(fetch_http(&url, options.timeout)?),
    };

    let mut reader: Box<dyn Read> = match source_compression(source) {
        Some(CompressionFormat::Gzip) => Box::new(flate2::read::MultiGzDecoder::new(reader)),
        Some(CompressionFormat::Zstd) => Box::new(zstd::stream::read::Decoder::new(reader)?),
        Some(CompressionFormat::Bzip2) => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
        Some(CompressionFormat::Xz) => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
        None => reader,
    };

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    debug!(source, bytes = bytes.len(), "fetched source");
    Ok(bytes)
}

/// Fetch and parse a dataset source into records.
pub fn load_dataset(source: &str, options: &LoadOptions) -> Result<Vec<Record>> {
    let bytes = fetch_source(source, options)?;
    parse_csv(bytes)
}

fn open_local(path: &Path) -> Result<File> {
    if path.is_dir() {
        return Err(eyre!("{} is a directory, not a file", path.display()));
    }
    Ok(File::open(path)?)
}

fn fetch_http(url: &str, timeout: Duration) -> Result<impl Read + Send> {
    let response = ureq::get(url).timeout(timeout).call()?;
    Ok(response.into_reader())
}
