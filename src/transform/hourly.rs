//! Builds the hourly view: explode, flatten precipitation, forward-fill temperature,
//! then drop out-of-range rows.

use crate::transform::cleaning::coerce_null_precipitation;
use crate::transform::explode::{explode_hourly, ExplodedHour};
use crate::transform::TemperatureBounds;
use crate::types::record::ValidRecord;
use crate::types::rows::HourlyRow;
use log::debug;

/// Placeholder for a forecast hour without a precipitation type.
pub const HOURLY_PRECIP_TYPE_FALLBACK: &str = "none";

/// Replaces every `None` with the closest preceding `Some` value.
///
/// Leading `None`s stay `None`. The scan runs over the whole slice; callers decide what a
/// "boundary" is by what they pass in.
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last_seen = None;
    values
        .iter()
        .map(|value| {
            if value.is_some() {
                last_seen = *value;
            }
            last_seen
        })
        .collect()
}

/// Builds the hourly view from cleaned records.
///
/// The fill state carries across capture boundaries: the first hours of a capture with
/// missing temperatures inherit the last temperature of the previous capture.
pub fn build_hourly_view(records: &[ValidRecord], bounds: TemperatureBounds) -> Vec<HourlyRow> {
    let exploded = explode_hourly(records);
    let raw: Vec<Option<f64>> = exploded.iter().map(|hour| hour.entry.temperature).collect();
    let filled = forward_fill(&raw);

    let total = exploded.len();
    let rows: Vec<HourlyRow> = exploded
        .into_iter()
        .zip(filled)
        .filter_map(|(hour, temperature)| {
            let temperature = temperature.filter(|t| bounds.contains(*t))?;
            Some(flatten_hour(hour, temperature))
        })
        .collect();

    debug!(
        "Hourly view: {} exploded rows, {} kept after range check",
        total,
        rows.len()
    );
    rows
}

fn flatten_hour(hour: ExplodedHour<'_>, temperature: f64) -> HourlyRow {
    let precipitation = hour.entry.precipitation.as_ref();
    HourlyRow {
        id: hour.id,
        capture_timestamp: hour.capture_timestamp.to_string(),
        date: hour.entry.date.clone(),
        weather: hour.entry.weather.clone(),
        summary: hour.entry.summary.clone(),
        temperature,
        precip_total: coerce_null_precipitation(precipitation.and_then(|p| p.total)),
        precip_type: precipitation
            .and_then(|p| p.kind.clone())
            .unwrap_or_else(|| HOURLY_PRECIP_TYPE_FALLBACK.to_string()),
    }
}
