//! Settings management for Ayumi.
//!
//! Handles loading, saving, and validating settings from the
//! platform-specific config directory.

use crate::error::ConfigError;
use crate::utils::clean_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name used for config directory.
const APP_NAME: &str = "Ayumi";

/// Default settings filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Persisted user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder holding one sub-folder per series.
    pub library_path: Option<PathBuf>,

    /// Python interpreter used to run the scraper (a path, or a command on PATH).
    pub python_path: Option<PathBuf>,

    /// Scraper script passed to the interpreter.
    pub scraper_path: Option<PathBuf>,
}

impl Settings {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the settings file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads settings from the default location.
    ///
    /// If the settings file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let settings = Settings::default();
            settings.save_to(path)?;
            return Ok(settings);
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(settings)
    }

    /// Saves settings to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Saves settings to a specific path.
    ///
    /// Writes a sibling temp file first and renames it over the target, so a
    /// crash never leaves a half-written settings file behind.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Returns the configured library folder.
    pub fn library_dir(&self) -> Result<PathBuf, ConfigError> {
        self.library_path
            .as_deref()
            .map(clean_path)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingValue(
                    "library_path (choose a library folder with `ayumi set-library`)".to_string(),
                )
            })
    }

    /// Returns the Python interpreter to run the scraper with.
    ///
    /// The configured value must either exist on disk or be a command found on PATH.
    pub fn python_command(&self) -> Result<PathBuf, ConfigError> {
        let raw = self
            .python_path
            .as_deref()
            .map(clean_path)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingValue(
                    "python_path (set it with `ayumi set-python`)".to_string(),
                )
            })?;

        if raw.exists() {
            return Ok(raw);
        }

        which::which(&raw).map_err(|_| ConfigError::InvalidValue {
            key: "python_path".to_string(),
            message: format!("Python not found: {}", raw.display()),
        })
    }

    /// Returns the scraper script path; it must exist on disk.
    pub fn scraper_script(&self) -> Result<PathBuf, ConfigError> {
        let path = self
            .scraper_path
            .as_deref()
            .map(clean_path)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingValue(
                    "scraper_path (set it with `ayumi set-scraper`)".to_string(),
                )
            })?;

        if !path.is_file() {
            return Err(ConfigError::InvalidValue {
                key: "scraper_path".to_string(),
                message: format!("Scraper not found: {}", path.display()),
            });
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.library_path.is_none());
        assert!(settings.python_path.is_none());
        assert!(settings.scraper_path.is_none());
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = Settings {
            library_path: Some(PathBuf::from("/home/me/Manga")),
            python_path: Some(PathBuf::from("/home/me/.venv/bin/python")),
            scraper_path: None,
        };
        let file = NamedTempFile::new().unwrap();

        settings.save_to(file.path()).unwrap();

        let loaded = Settings::load_from(file.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILENAME);

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        Settings::default().save_to(&path).unwrap();
        let updated = Settings {
            library_path: Some(PathBuf::from("/tmp/lib")),
            ..Settings::default()
        };
        updated.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), updated);
        assert!(!dir.path().join("config.toml.tmp").exists());
    }

    #[test]
    fn test_malformed_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "library_path = [").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_library_dir_required() {
        let settings = Settings::default();
        assert!(matches!(
            settings.library_dir(),
            Err(ConfigError::MissingValue(_))
        ));

        let settings = Settings {
            library_path: Some(PathBuf::from("\"/tmp/lib\"")),
            ..Settings::default()
        };
        assert_eq!(settings.library_dir().unwrap(), PathBuf::from("/tmp/lib"));
    }

    #[test]
    fn test_scraper_script_must_exist() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            scraper_path: Some(dir.path().join("scrap_nautiljon.py")),
            ..Settings::default()
        };
        assert!(matches!(
            settings.scraper_script(),
            Err(ConfigError::InvalidValue { .. })
        ));

        std::fs::write(dir.path().join("scrap_nautiljon.py"), "print('hi')").unwrap();
        assert!(settings.scraper_script().is_ok());
    }

    #[test]
    fn test_python_command_validation() {
        let settings = Settings::default();
        assert!(matches!(
            settings.python_command(),
            Err(ConfigError::MissingValue(_))
        ));

        let settings = Settings {
            python_path: Some(PathBuf::from("/definitely/not/here/python")),
            ..Settings::default()
        };
        assert!(matches!(
            settings.python_command(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let file = NamedTempFile::new().unwrap();
        let settings = Settings {
            python_path: Some(file.path().to_path_buf()),
            ..Settings::default()
        };
        assert_eq!(settings.python_command().unwrap(), file.path().to_path_buf());
    }
}
