//! Picks the latest current-conditions block and flattens it into one row.

use crate::transform::cleaning::coerce_null_precipitation;
use crate::transform::CurrentSelection;
use crate::types::record::{CurrentConditions, ValidRecord};
use crate::types::rows::CurrentRow;

/// Placeholder for a missing precipitation type or wind direction in the current view.
pub const CURRENT_TEXT_FALLBACK: &str = "unknown";

/// Returns the current-conditions row of the highest-id record that qualifies.
///
/// A record qualifies when it has a `current` block and, under
/// [`CurrentSelection::RequireHourly`], a forecast list as well.
pub fn select_current(records: &[ValidRecord], selection: CurrentSelection) -> Option<CurrentRow> {
    let mut by_recency: Vec<&ValidRecord> = records.iter().collect();
    by_recency.sort_by(|a, b| b.id.cmp(&a.id));

    by_recency
        .into_iter()
        .filter(|record| match selection {
            CurrentSelection::RequireHourly => record.hourly.is_some(),
            CurrentSelection::CurrentOnly => true,
        })
        .find_map(|record| {
            record
                .current
                .as_ref()
                .map(|current| flatten_current(&record.capture_timestamp, current))
        })
}

fn flatten_current(capture_timestamp: &str, current: &CurrentConditions) -> CurrentRow {
    let precipitation = current.precipitation.as_ref();
    let wind = current.wind.as_ref();
    CurrentRow {
        capture_timestamp: capture_timestamp.to_string(),
        temperature: current.temperature,
        summary: current.summary.clone(),
        icon: current.icon.clone(),
        cloud_cover: current.cloud_cover,
        precip_total: coerce_null_precipitation(precipitation.and_then(|p| p.total)),
        precip_type: precipitation
            .and_then(|p| p.kind.clone())
            .unwrap_or_else(|| CURRENT_TEXT_FALLBACK.to_string()),
        wind_speed: wind.and_then(|w| w.speed).unwrap_or(0.0),
        wind_angle: wind.and_then(|w| w.angle).unwrap_or(0),
        wind_dir: wind
            .and_then(|w| w.dir.clone())
            .unwrap_or_else(|| CURRENT_TEXT_FALLBACK.to_string()),
    }
}
