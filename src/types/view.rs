//! Defines the three derived views and the fixed column layout each one exports.

use polars::prelude::{DataType, Field, Schema};
use std::fmt;
use std::str::FromStr;

/// One of the derived views produced for every table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// One row per forecast hour, forward-filled and range-checked.
    HourlyWeather,
    /// At most one row: the most recent current-conditions block.
    CurrentWeather,
    /// One row per source capture with temperature and precipitation aggregates.
    DailyStats,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [
        ViewKind::HourlyWeather,
        ViewKind::CurrentWeather,
        ViewKind::DailyStats,
    ];

    pub fn view_name(&self) -> &'static str {
        match self {
            ViewKind::HourlyWeather => "hourly_weather",
            ViewKind::CurrentWeather => "current_weather",
            ViewKind::DailyStats => "daily_stats",
        }
    }

    /// Logical name of the view for a given source table, used as the snapshot file prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use weather_silver::ViewKind;
    ///
    /// assert_eq!(ViewKind::DailyStats.logical_name("meteosource"), "meteosource_daily_stats");
    /// ```
    pub fn logical_name(&self, table: &str) -> String {
        format!("{}_{}", table, self.view_name())
    }

    /// Column names and types exactly as exported.
    pub fn columns(&self) -> Vec<(&'static str, DataType)> {
        match self {
            ViewKind::HourlyWeather => vec![
                ("id", DataType::Int64),
                ("capture_timestamp", DataType::String),
                ("date", DataType::String),
                ("weather", DataType::String),
                ("summary", DataType::String),
                ("temperature", DataType::Float64),
                ("precip_total", DataType::Float64),
                ("precip_type", DataType::String),
            ],
            ViewKind::CurrentWeather => vec![
                ("capture_timestamp", DataType::String),
                ("temperature", DataType::Float64),
                ("summary", DataType::String),
                ("icon", DataType::String),
                ("cloud_cover", DataType::Float64),
                ("precip_total", DataType::Float64),
                ("precip_type", DataType::String),
                ("wind_speed", DataType::Float64),
                ("wind_angle", DataType::Int64),
                ("wind_dir", DataType::String),
            ],
            ViewKind::DailyStats => vec![
                ("id", DataType::Int64),
                ("temp_max", DataType::Float64),
                ("temp_min", DataType::Float64),
                ("temp_avg", DataType::Float64),
                ("precip_total_diaria", DataType::Float64),
            ],
        }
    }

    pub fn schema(&self) -> Schema {
        self.columns()
            .into_iter()
            .map(|(name, dtype)| Field::new(name.into(), dtype))
            .collect()
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.view_name())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewKind::ALL
            .into_iter()
            .find(|kind| kind.view_name() == s)
            .ok_or_else(|| format!("unknown view '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_names_round_trip_through_from_str() {
        for kind in ViewKind::ALL {
            assert_eq!(kind.view_name().parse::<ViewKind>(), Ok(kind));
        }
        assert!("weekly_stats".parse::<ViewKind>().is_err());
    }

    #[test]
    fn test_schema_matches_column_list() {
        let schema = ViewKind::CurrentWeather.schema();
        assert_eq!(schema.len(), 10);
        assert_eq!(schema.get("wind_angle"), Some(&DataType::Int64));
        assert_eq!(schema.get("precip_type"), Some(&DataType::String));
    }
}
