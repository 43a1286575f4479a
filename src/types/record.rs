//! Defines the typed shape of one stored weather capture: the current conditions
//! block, the hourly forecast list and their nested precipitation and wind parts.

use serde::{Deserialize, Deserializer};

/// Precipitation reading attached to both the current conditions and every forecast hour.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Precipitation {
    /// Total amount of precipitation, if reported.
    pub total: Option<f64>,
    /// Precipitation type as reported by the provider (e.g. "rain", "none").
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Wind reading of the current conditions.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Wind {
    pub speed: Option<f64>,
    /// Direction in whole degrees.
    pub angle: Option<i64>,
    /// Compass direction (e.g. "NNE").
    pub dir: Option<String>,
}

/// The "current" block of a capture.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub summary: Option<String>,
    pub icon: Option<String>,
    pub cloud_cover: Option<f64>,
    pub wind: Option<Wind>,
    pub precipitation: Option<Precipitation>,
}

/// One hour of the forecast carried by a capture.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct HourEntry {
    pub date: Option<String>,
    /// Provider weather code, kept as text.
    pub weather: Option<String>,
    pub summary: Option<String>,
    pub temperature: Option<f64>,
    pub precipitation: Option<Precipitation>,
}

/// One stored capture, decoded from the store row and its JSON payload.
///
/// `id` and `capture_timestamp` are required for a record to take part in any
/// derived view; see [`ValidRecord`] for the cleaned form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherRecord {
    /// Store-assigned, monotonically increasing identifier. Higher means more recent.
    pub id: Option<i64>,
    pub capture_timestamp: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub current: Option<CurrentConditions>,
    pub hourly: Option<Vec<HourEntry>>,
}

/// A record that passed the required-field check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecord {
    pub id: i64,
    pub capture_timestamp: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub current: Option<CurrentConditions>,
    pub hourly: Option<Vec<HourEntry>>,
}

impl WeatherRecord {
    /// Promotes the record to a [`ValidRecord`], or returns `None` when `id` or
    /// `capture_timestamp` is missing.
    pub fn into_valid(self) -> Option<ValidRecord> {
        Some(ValidRecord {
            id: self.id?,
            capture_timestamp: self.capture_timestamp?,
            lat: self.lat,
            lon: self.lon,
            current: self.current,
            hourly: self.hourly,
        })
    }
}

/// Wire shape of the JSON payload column.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct Payload {
    pub lat: Option<String>,
    pub lon: Option<String>,
    #[serde(rename = "timestamp_captura", alias = "capture_timestamp")]
    pub capture_timestamp: Option<String>,
    pub current: Option<CurrentConditions>,
    pub hourly: Option<HourlyBlock>,
}

/// The forecast list is wrapped in `{"data": [...]}` on the wire.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct HourlyBlock {
    #[serde(default, deserialize_with = "nullable_entries")]
    pub data: Option<Vec<HourEntry>>,
}

// A null element of the list decodes to an hour with every field null.
fn nullable_entries<'de, D>(deserializer: D) -> Result<Option<Vec<HourEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Option<HourEntry>>> = Option::deserialize(deserializer)?;
    Ok(entries.map(|list| list.into_iter().map(Option::unwrap_or_default).collect()))
}

impl Payload {
    pub(crate) fn into_record(self, id: Option<i64>) -> WeatherRecord {
        WeatherRecord {
            id,
            capture_timestamp: self.capture_timestamp,
            lat: self.lat,
            lon: self.lon,
            current: self.current,
            hourly: self.hourly.and_then(|block| block.data),
        }
    }
}
