//! Ayumi - manga collection tracker.
//!
//! This library provides functionality for:
//! - Scanning a library folder of per-series `data.json` files into sorted summaries
//! - Normalizing release dates and computing ownership statistics
//! - Running the external scraper and refreshing the library afterwards

pub mod config;
pub mod console;
pub mod error;
pub mod library;
pub mod runner;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use console::Console;
pub use error::{ConfigError, ScraperError, SeriesError};
pub use library::{LibraryScanner, ScanReport, SeriesSummary, UpcomingRelease, scan_library};
pub use runner::{ProcessRunner, PythonRunner, RunEvent, RunRequest, RunResult};
pub use search::search_series;
