//! Library scanning and summarization.
//!
//! This module turns a folder of per-series `data.json` files into a list
//! of [`SeriesSummary`] values sorted by upcoming release.

pub mod dates;
pub mod record;
mod scan;
mod summary;

pub use dates::{NormalizedDate, normalize_date};
pub use record::{SeriesRecord, VolumeNumber};
pub use scan::{LibraryScanner, METADATA_FILENAME, ScanReport, SkippedSeries, load_record, scan_library};
pub use summary::{Completeness, SeriesSummary, UpcomingRelease, by_release_date};
