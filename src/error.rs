//! Error types for the Ayumi application.
//!
//! Uses `thiserror` for structured error definitions that provide
//! clear context about what went wrong.

use thiserror::Error;

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the settings file
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize the settings file
    #[error("Failed to parse settings: {0}")]
    ParseError(String),

    /// Missing required configuration value
    #[error("Missing required setting: {0}")]
    MissingValue(String),

    /// Invalid configuration value
    #[error("Invalid setting '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Error type for loading a single series folder.
///
/// The library scan never propagates these; they only show up in a
/// [`ScanReport`](crate::library::ScanReport) for diagnostics.
#[derive(Error, Debug)]
pub enum SeriesError {
    /// The metadata file exists but could not be read
    #[error("Failed to read series metadata: {0}")]
    Read(#[from] std::io::Error),

    /// The metadata file is not valid series JSON
    #[error("Failed to parse series metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error type for running the external scraper.
#[derive(Error, Debug)]
pub enum ScraperError {
    /// The search query was empty or only whitespace
    #[error("Search query is empty")]
    EmptyQuery,

    /// Settings are missing or point at files that don't exist
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The library root could not be created
    #[error("Failed to prepare library folder: {0}")]
    Library(std::io::Error),

    /// The scraper process could not be started
    #[error("Failed to start scraper: {0}")]
    Spawn(std::io::Error),

    /// The scraper exited with a non-zero status
    #[error("Scraper failed (code {code})\n{detail}")]
    Failed { code: i32, detail: String },
}

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn fail_search() -> Result<()> {
        Err(ScraperError::Failed {
            code: 2,
            detail: "no results".to_string(),
        })
        .context("Search failed")?;
        Ok(())
    }

    #[test]
    fn test_result_alias_keeps_source_error() {
        let err = fail_search().unwrap_err();
        assert_eq!(err.to_string(), "Search failed");
        match err.downcast_ref::<ScraperError>() {
            Some(ScraperError::Failed { code, detail }) => {
                assert_eq!(*code, 2);
                assert_eq!(detail, "no results");
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn test_config_error_converts_into_scraper_error() {
        let err: ScraperError = ConfigError::MissingValue("library_path".to_string()).into();
        assert!(matches!(err, ScraperError::Config(ConfigError::MissingValue(_))));
        assert!(err.to_string().contains("library_path"));
    }
}
