//! The cleaning and derivation stages.
//!
//! All three views are pure functions of the same cleaned batch; none reads another's
//! output.

pub mod cleaning;
pub mod current;
pub mod error;
pub mod explode;
pub mod hourly;
pub mod stats;

use crate::transform::error::TransformError;
use crate::types::record::ValidRecord;
use crate::types::rows::{CurrentRow, DailyStatsRow, HourlyRow};

/// Inclusive plausibility range for hourly temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureBounds {
    pub min: f64,
    pub max: f64,
}

impl TemperatureBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Like [`TemperatureBounds::new`], but rejects a range that would drop every row:
    /// `min > max`, or either end NaN.
    pub fn try_new(min: f64, max: f64) -> Result<Self, TransformError> {
        if min <= max {
            Ok(Self::new(min, max))
        } else {
            Err(TransformError::InvertedBounds { min, max })
        }
    }

    pub fn contains(&self, temperature: f64) -> bool {
        temperature >= self.min && temperature <= self.max
    }
}

impl Default for TemperatureBounds {
    fn default() -> Self {
        Self::new(-60.0, 60.0)
    }
}

/// Which records may supply the current-conditions row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentSelection {
    /// The record needs both a `current` block and a forecast list.
    #[default]
    RequireHourly,
    /// Only the `current` block is required.
    CurrentOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformOptions {
    pub temperature_bounds: TemperatureBounds,
    pub current_selection: CurrentSelection,
}

/// The three views derived from one batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedViews {
    pub hourly: Vec<HourlyRow>,
    pub current: Option<CurrentRow>,
    pub daily_stats: Vec<DailyStatsRow>,
}

/// Derives every view from records that already passed [`cleaning::drop_incomplete`].
pub fn derive_views(records: &[ValidRecord], options: &TransformOptions) -> DerivedViews {
    DerivedViews {
        hourly: hourly::build_hourly_view(records, options.temperature_bounds),
        current: current::select_current(records, options.current_selection),
        daily_stats: stats::build_daily_stats(records),
    }
}
