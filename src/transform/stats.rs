//! Per-capture aggregates over the exploded forecast hours.
//!
//! Temperature statistics use only the hours that report a temperature; the
//! precipitation total uses every hour, counting missing totals as zero. A capture
//! with no temperature readings at all produces no row.

use crate::transform::cleaning::{coerce_null_precipitation, exclude_null_temperature};
use crate::transform::explode::explode_hourly;
use crate::types::record::ValidRecord;
use crate::types::rows::DailyStatsRow;
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

#[derive(Default)]
struct TemperatureAccumulator {
    max: Option<OrderedFloat<f64>>,
    min: Option<OrderedFloat<f64>>,
    sum: f64,
    count: usize,
}

impl TemperatureAccumulator {
    fn push(&mut self, temperature: f64) {
        let value = OrderedFloat(temperature);
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.sum += temperature;
        self.count += 1;
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds one [`DailyStatsRow`] per capture id, in ascending id order.
pub fn build_daily_stats(records: &[ValidRecord]) -> Vec<DailyStatsRow> {
    let exploded = explode_hourly(records);

    let mut precipitation: BTreeMap<i64, f64> = BTreeMap::new();
    for hour in &exploded {
        let total = hour.entry.precipitation.as_ref().and_then(|p| p.total);
        *precipitation.entry(hour.id).or_default() += coerce_null_precipitation(total);
    }

    let mut temperatures: BTreeMap<i64, TemperatureAccumulator> = BTreeMap::new();
    let readings = exploded
        .iter()
        .map(|hour| (hour.id, hour.entry.temperature));
    for (id, temperature) in exclude_null_temperature(readings) {
        temperatures.entry(id).or_default().push(temperature);
    }

    temperatures
        .into_iter()
        .filter_map(|(id, acc)| {
            let (max, min) = (acc.max?, acc.min?);
            Some(DailyStatsRow {
                id,
                temp_max: max.into_inner(),
                temp_min: min.into_inner(),
                temp_avg: round2(acc.sum / acc.count as f64),
                precip_total_diaria: precipitation.get(&id).copied().unwrap_or(0.0),
            })
        })
        .collect()
}
