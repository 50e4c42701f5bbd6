//! On-disk series metadata, as written by the scraper into `data.json`.
//!
//! Every field is optional on read: the scraper's output has changed shape
//! over time and a missing or malformed field must not make the whole series
//! unreadable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Volume status meaning the volume has been released.
pub const STATUS_OUT: &str = "OUT";

/// Volume status meaning the volume is known but not yet released.
pub const STATUS_ANNOUNCED: &str = "ANNOUNCED";

/// One series record, deserialized from a `data.json` file.
///
/// Only the top level has to be an object. A field that is `null` or of the
/// wrong type reads as its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesRecord {
    #[serde(deserialize_with = "lenient")]
    pub titles: Titles,
    #[serde(deserialize_with = "lenient_volumes")]
    pub volumes: BTreeMap<String, VolumeEntry>,
    #[serde(deserialize_with = "lenient")]
    pub collection: Collection,
    #[serde(deserialize_with = "lenient")]
    pub soon_out: Option<ReleaseInfo>,
    #[serde(deserialize_with = "lenient")]
    pub last_scraped_at: Option<String>,
}

/// Display names of a series.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Titles {
    #[serde(deserialize_with = "lenient")]
    pub main: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub alt: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub original: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub japanese: Option<String>,
}

/// A single volume entry from the `volumes` mapping.
///
/// `number` and `status` are kept as raw JSON values because the scraper has
/// emitted numbers and numeric strings for the former, and only the exact
/// string `"OUT"` matters for the latter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VolumeEntry {
    pub number: Value,
    pub status: Value,
}

impl VolumeEntry {
    /// Returns true if this volume has been released.
    pub fn is_out(&self) -> bool {
        self.status.as_str() == Some(STATUS_OUT)
    }
}

/// The user's collection state for a series.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Collection {
    #[serde(deserialize_with = "lenient")]
    pub owned: Vec<Value>,
}

/// The next upcoming volume of a series.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReleaseInfo {
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub date: String,
}

/// Reads a field, falling back to its default when the value doesn't fit.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Reads the `volumes` mapping, dropping entries that aren't volume objects.
fn lenient_volumes<'de, D>(deserializer: D) -> Result<BTreeMap<String, VolumeEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    Ok(entries
        .into_iter()
        .filter(|(_, entry)| entry.is_object())
        .filter_map(|(key, entry)| {
            serde_json::from_value(entry)
                .ok()
                .map(|volume| (key, volume))
        })
        .collect())
}

/// A volume number normalized for set membership.
///
/// Numbers are compared by value, so `2`, `2.0` and `"2"` are the same volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VolumeNumber(u64);

impl VolumeNumber {
    /// Coerces a JSON value into a volume number.
    ///
    /// Accepts finite numbers and strings holding a finite number.
    /// Anything else (null, booleans, objects, `"abc"`) is not a volume number.
    pub fn from_json(value: &Value) -> Option<Self> {
        let n = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        Self::from_f64(n)
    }

    fn from_f64(n: f64) -> Option<Self> {
        if !n.is_finite() {
            return None;
        }
        // -0.0 and 0.0 are the same volume
        let n = if n == 0.0 { 0.0 } else { n };
        Some(Self(n.to_bits()))
    }

    /// Returns the numeric value.
    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}
