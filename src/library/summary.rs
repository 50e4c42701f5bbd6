//! Derived per-series summaries shown to the user.

use super::dates::normalize_date;
use super::record::{ReleaseInfo, SeriesRecord, VolumeNumber};
use crate::utils::display_name;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Summary of one series folder, rebuilt on every scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub folder_path: PathBuf,
    pub json_path: PathBuf,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soon_out: Option<UpcomingRelease>,
    pub missing_count: usize,
    pub out_count: usize,
    pub owned_count: usize,
    pub progress_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scraped_at: Option<String>,
}

/// The next upcoming volume, with its date normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRelease {
    pub title: String,
    pub date_raw: String,
    #[serde(rename = "dateISO", skip_serializing_if = "Option::is_none")]
    pub date_iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Local>>,
}

impl UpcomingRelease {
    fn from_record(info: &ReleaseInfo) -> Self {
        let date = normalize_date(&info.date);
        Self {
            title: info.title.clone(),
            date_raw: info.date.clone(),
            date_iso: date.iso,
            ts: date.instant,
        }
    }
}

/// Ownership counts for a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Completeness {
    /// Distinct released volume numbers.
    pub out: usize,
    /// Distinct released volume numbers the user owns.
    pub owned: usize,
}

impl Completeness {
    /// Computes completeness from a series record.
    ///
    /// Only volumes with status exactly `"OUT"` count. Duplicate volume
    /// numbers collapse, and owned volumes that are not released are ignored.
    pub fn from_record(record: &SeriesRecord) -> Self {
        let out: HashSet<VolumeNumber> = record
            .volumes
            .values()
            .filter(|v| v.is_out())
            .filter_map(|v| VolumeNumber::from_json(&v.number))
            .collect();

        let owned: HashSet<VolumeNumber> = record
            .collection
            .owned
            .iter()
            .filter_map(VolumeNumber::from_json)
            .collect();

        Self {
            out: out.len(),
            owned: out.intersection(&owned).count(),
        }
    }

    /// Released volumes the user doesn't own, never negative.
    pub fn missing(&self) -> usize {
        self.out.saturating_sub(self.owned)
    }

    /// Human-readable `owned/out` label.
    pub fn label(&self) -> String {
        format!("{}/{}", self.owned, self.out)
    }
}

impl SeriesSummary {
    /// Builds a summary for the series stored in `folder_path`.
    pub fn from_record(folder_path: &Path, json_path: &Path, record: &SeriesRecord) -> Self {
        let completeness = Completeness::from_record(record);

        Self {
            folder_path: folder_path.to_path_buf(),
            json_path: json_path.to_path_buf(),
            title: display_title(folder_path, record),
            soon_out: record.soon_out.as_ref().map(UpcomingRelease::from_record),
            missing_count: completeness.missing(),
            out_count: completeness.out,
            owned_count: completeness.owned,
            progress_label: completeness.label(),
            last_scraped_at: record.last_scraped_at.clone(),
        }
    }

    /// The instant of the next release, if it could be resolved.
    pub fn release_instant(&self) -> Option<DateTime<Local>> {
        self.soon_out.as_ref().and_then(|s| s.ts)
    }

    /// Returns true if every released volume is owned.
    pub fn is_complete(&self) -> bool {
        self.missing_count == 0
    }
}

/// `titles.main`, or the folder name when that is missing or blank.
fn display_title(folder_path: &Path, record: &SeriesRecord) -> String {
    record
        .titles
        .main
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| display_name(folder_path))
}

/// Orders summaries by soonest release; unresolved dates sort last.
pub fn by_release_date(a: &SeriesSummary, b: &SeriesSummary) -> Ordering {
    match (a.release_instant(), b.release_instant()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
