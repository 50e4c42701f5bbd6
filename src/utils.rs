//! Utility functions for common operations.

use std::path::{Path, PathBuf};

/// Cleans a user-supplied path.
///
/// Paths pasted from a file manager often carry surrounding whitespace or
/// double quotes (`"C:\Program Files\Python\python.exe"`); both are stripped.
pub fn clean_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let cleaned = raw.trim().trim_matches('"').trim();
    if cleaned == raw.as_ref() {
        return path.to_path_buf();
    }
    PathBuf::from(cleaned)
}

/// Returns the final component of a path as a display string.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
