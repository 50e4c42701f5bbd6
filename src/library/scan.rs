//! Library folder scanning.
//!
//! The library is a directory with one sub-folder per series, each holding a
//! `data.json` written by the scraper. There is no index: every scan walks
//! the folders again and rebuilds the summaries from scratch.

use super::record::SeriesRecord;
use super::summary::{SeriesSummary, by_release_date};
use crate::error::SeriesError;
use std::path::{Path, PathBuf};

/// Name of the metadata file inside each series folder.
pub const METADATA_FILENAME: &str = "data.json";

/// A series folder that has a metadata file but couldn't be loaded.
#[derive(Debug)]
pub struct SkippedSeries {
    pub folder_path: PathBuf,
    pub error: SeriesError,
}

/// Outcome of a library scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Summaries, soonest upcoming release first.
    pub series: Vec<SeriesSummary>,
    /// Series folders left out because their metadata was unreadable.
    pub skipped: Vec<SkippedSeries>,
}

/// Scans a library root for series folders.
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    root: PathBuf,
}

impl LibraryScanner {
    /// Creates a scanner for the given library root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the library root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans the library.
    ///
    /// A missing root is a valid empty library. A broken series folder is
    /// recorded in [`ScanReport::skipped`] and never stops the scan.
    pub fn scan(&self) -> ScanReport {
        let mut report = ScanReport::default();

        for folder_path in self.series_folders() {
            let json_path = folder_path.join(METADATA_FILENAME);
            if !json_path.is_file() {
                // Not a series folder
                continue;
            }

            match load_record(&json_path) {
                Ok(record) => report.series.push(SeriesSummary::from_record(
                    &folder_path,
                    &json_path,
                    &record,
                )),
                Err(error) => report.skipped.push(SkippedSeries { folder_path, error }),
            }
        }

        // Stable: equal or missing dates keep folder order
        report.series.sort_by(by_release_date);
        report
    }

    /// Immediate sub-directories of the root, ordered by name.
    fn series_folders(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut folders: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();

        folders.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        folders
    }
}

/// Reads and parses a single `data.json`.
pub fn load_record(json_path: &Path) -> Result<SeriesRecord, SeriesError> {
    let content = std::fs::read_to_string(json_path)?;
    let record = serde_json::from_str(&content)?;
    Ok(record)
}

/// Scans a library root and returns its summaries.
///
/// Shorthand for `LibraryScanner::new(root).scan().series`.
pub fn scan_library(root: impl AsRef<Path>) -> Vec<SeriesSummary> {
    LibraryScanner::new(root.as_ref()).scan().series
}
