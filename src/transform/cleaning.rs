//! Null handling shared by the derived views.
//!
//! The required-field check runs once, before any view is built. Temperature and
//! precipitation have deliberately different null policies, so each is a named
//! function of its own rather than per-column special cases.

use crate::types::record::{ValidRecord, WeatherRecord};
use log::info;

/// Removes records without an `id` or a `capture_timestamp`, keeping store order.
pub fn drop_incomplete(records: Vec<WeatherRecord>) -> Vec<ValidRecord> {
    let total = records.len();
    let valid: Vec<ValidRecord> = records
        .into_iter()
        .filter_map(WeatherRecord::into_valid)
        .collect();
    if valid.len() < total {
        info!(
            "Dropped {} of {} records missing an id or capture timestamp",
            total - valid.len(),
            total
        );
    }
    valid
}

/// Missing precipitation totals count as "no rain".
pub fn coerce_null_precipitation(total: Option<f64>) -> f64 {
    total.unwrap_or(0.0)
}

/// Missing temperature readings are left out of statistics rather than imputed.
///
/// Yields the present readings paired with their items, in input order.
pub fn exclude_null_temperature<T, I>(items: I) -> impl Iterator<Item = (T, f64)>
where
    I: IntoIterator<Item = (T, Option<f64>)>,
{
    items
        .into_iter()
        .filter_map(|(item, temperature)| temperature.map(|t| (item, t)))
}
