//! File helpers shared by all stages
//!
//! Reading is tolerant: a stage asks for a file and gets `None` back when it
//! cannot be used, so one broken paper never stops a batch. Writing is
//! append-only CSV without headers.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// How the bytes of a [`FileContents`] were decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// Fallback for TeX sources saved in ISO-8859-1; every byte maps to one char.
    Latin1,
}

/// Decoded text of a file together with the path it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    pub path: PathBuf,
    pub contents: String,
    pub encoding: Encoding,
}

/// Read a text file, returning `None` if it is missing, unreadable or binary.
///
/// UTF-8 is tried first. Non-UTF-8 input without NUL bytes is decoded as
/// Latin-1; input containing NUL bytes is treated as binary.
pub fn read_file_tolerant(path: &Path) -> Option<FileContents> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Could not read {}: {e}", path.display());
            return None;
        }
    };

    match String::from_utf8(bytes) {
        Ok(contents) => Some(FileContents {
            path: path.to_path_buf(),
            contents,
            encoding: Encoding::Utf8,
        }),
        Err(e) => {
            let bytes = e.into_bytes();
            if bytes.contains(&0) {
                log::warn!("Skipping binary file {}", path.display());
                return None;
            }
            log::debug!("{} is not UTF-8, decoding as Latin-1", path.display());
            Some(FileContents {
                path: path.to_path_buf(),
                contents: bytes.iter().map(|&b| char::from(b)).collect(),
                encoding: Encoding::Latin1,
            })
        }
    }
}

/// Remove a directory and everything in it. Missing directories are fine.
pub fn clean_directory(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("failed to clean {}", dir.display()))?;
    }
    Ok(())
}

/// Files under `dir` (recursively) whose extension is one of `extensions`.
///
/// Extensions are given without the dot and compared case-insensitively.
/// The result is sorted so repeated loads see files in the same order.
pub fn find_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join("**/*");
    let pattern_str = pattern.to_string_lossy();

    let paths = match glob::glob(&pattern_str) {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("Invalid search pattern {pattern_str}: {e}");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        })
        .collect();
    files.sort();
    files
}

/// Append one record as a CSV row, creating the file if needed.
pub fn append_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {} for append", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer
        .serialize(record)
        .with_context(|| format!("failed to write row to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Read every row of a header-less CSV file into `T`, by column position.
///
/// Rows may differ in width. Whether a short row is an error is up to `T`:
/// a struct with a missing field fails, `Vec<String>` takes what is there.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .with_context(|| format!("failed to parse {}", path.display()))
}
