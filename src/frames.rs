//! Conversion between derived rows and Polars `DataFrame`s.
//!
//! Frames carry exactly the exported column names and types listed by
//! [`ViewKind::columns`]. The reverse direction lets consumers of exported snapshots get
//! typed rows back.

use crate::transform::DerivedViews;
use crate::types::rows::{CurrentRow, DailyStatsRow, HourlyRow};
use crate::types::view::ViewKind;
use polars::prelude::*;

/// A derived view materialized as a `DataFrame`.
#[derive(Debug, Clone)]
pub struct ViewFrame {
    pub kind: ViewKind,
    pub frame: DataFrame,
}

impl ViewFrame {
    pub fn new(kind: ViewKind, frame: DataFrame) -> Self {
        Self { kind, frame }
    }

    /// First `rows` rows, for console display.
    pub fn preview(&self, rows: usize) -> DataFrame {
        self.frame.head(Some(rows))
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

pub fn hourly_frame(rows: &[HourlyRow]) -> PolarsResult<DataFrame> {
    df!(
        "id" => rows.iter().map(|r| r.id).collect::<Vec<i64>>(),
        "capture_timestamp" => rows.iter().map(|r| r.capture_timestamp.as_str()).collect::<Vec<&str>>(),
        "date" => rows.iter().map(|r| r.date.as_deref()).collect::<Vec<Option<&str>>>(),
        "weather" => rows.iter().map(|r| r.weather.as_deref()).collect::<Vec<Option<&str>>>(),
        "summary" => rows.iter().map(|r| r.summary.as_deref()).collect::<Vec<Option<&str>>>(),
        "temperature" => rows.iter().map(|r| r.temperature).collect::<Vec<f64>>(),
        "precip_total" => rows.iter().map(|r| r.precip_total).collect::<Vec<f64>>(),
        "precip_type" => rows.iter().map(|r| r.precip_type.as_str()).collect::<Vec<&str>>(),
    )
}

pub fn current_frame(rows: &[CurrentRow]) -> PolarsResult<DataFrame> {
    df!(
        "capture_timestamp" => rows.iter().map(|r| r.capture_timestamp.as_str()).collect::<Vec<&str>>(),
        "temperature" => rows.iter().map(|r| r.temperature).collect::<Vec<Option<f64>>>(),
        "summary" => rows.iter().map(|r| r.summary.as_deref()).collect::<Vec<Option<&str>>>(),
        "icon" => rows.iter().map(|r| r.icon.as_deref()).collect::<Vec<Option<&str>>>(),
        "cloud_cover" => rows.iter().map(|r| r.cloud_cover).collect::<Vec<Option<f64>>>(),
        "precip_total" => rows.iter().map(|r| r.precip_total).collect::<Vec<f64>>(),
        "precip_type" => rows.iter().map(|r| r.precip_type.as_str()).collect::<Vec<&str>>(),
        "wind_speed" => rows.iter().map(|r| r.wind_speed).collect::<Vec<f64>>(),
        "wind_angle" => rows.iter().map(|r| r.wind_angle).collect::<Vec<i64>>(),
        "wind_dir" => rows.iter().map(|r| r.wind_dir.as_str()).collect::<Vec<&str>>(),
    )
}

pub fn daily_stats_frame(rows: &[DailyStatsRow]) -> PolarsResult<DataFrame> {
    df!(
        "id" => rows.iter().map(|r| r.id).collect::<Vec<i64>>(),
        "temp_max" => rows.iter().map(|r| r.temp_max).collect::<Vec<f64>>(),
        "temp_min" => rows.iter().map(|r| r.temp_min).collect::<Vec<f64>>(),
        "temp_avg" => rows.iter().map(|r| r.temp_avg).collect::<Vec<f64>>(),
        "precip_total_diaria" => rows.iter().map(|r| r.precip_total_diaria).collect::<Vec<f64>>(),
    )
}

impl DerivedViews {
    /// Materializes all three views, in [`ViewKind::ALL`] order.
    pub fn to_frames(&self) -> PolarsResult<Vec<ViewFrame>> {
        let current: Vec<CurrentRow> = self.current.iter().cloned().collect();
        Ok(vec![
            ViewFrame::new(ViewKind::HourlyWeather, hourly_frame(&self.hourly)?),
            ViewFrame::new(ViewKind::CurrentWeather, current_frame(&current)?),
            ViewFrame::new(ViewKind::DailyStats, daily_stats_frame(&self.daily_stats)?),
        ])
    }
}

fn null_at(column: &str, row: usize) -> PolarsError {
    PolarsError::ComputeError(format!("unexpected null in column '{}' at row {}", column, row).into())
}

impl HourlyRow {
    /// Reads rows back from a frame shaped like the hourly view.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Vec<HourlyRow>> {
        let id = df.column("id")?.i64()?;
        let capture_timestamp = df.column("capture_timestamp")?.str()?;
        let date = df.column("date")?.str()?;
        let weather = df.column("weather")?.str()?;
        let summary = df.column("summary")?.str()?;
        let temperature = df.column("temperature")?.f64()?;
        let precip_total = df.column("precip_total")?.f64()?;
        let precip_type = df.column("precip_type")?.str()?;

        (0..df.height())
            .map(|i| {
                Ok(HourlyRow {
                    id: id.get(i).ok_or_else(|| null_at("id", i))?,
                    capture_timestamp: capture_timestamp
                        .get(i)
                        .ok_or_else(|| null_at("capture_timestamp", i))?
                        .to_string(),
                    date: date.get(i).map(str::to_string),
                    weather: weather.get(i).map(str::to_string),
                    summary: summary.get(i).map(str::to_string),
                    temperature: temperature.get(i).ok_or_else(|| null_at("temperature", i))?,
                    precip_total: precip_total.get(i).ok_or_else(|| null_at("precip_total", i))?,
                    precip_type: precip_type
                        .get(i)
                        .ok_or_else(|| null_at("precip_type", i))?
                        .to_string(),
                })
            })
            .collect()
    }
}

impl DailyStatsRow {
    /// Reads rows back from a frame shaped like the daily statistics view.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Vec<DailyStatsRow>> {
        let id = df.column("id")?.i64()?;
        let temp_max = df.column("temp_max")?.f64()?;
        let temp_min = df.column("temp_min")?.f64()?;
        let temp_avg = df.column("temp_avg")?.f64()?;
        let precip = df.column("precip_total_diaria")?.f64()?;

        (0..df.height())
            .map(|i| {
                Ok(DailyStatsRow {
                    id: id.get(i).ok_or_else(|| null_at("id", i))?,
                    temp_max: temp_max.get(i).ok_or_else(|| null_at("temp_max", i))?,
                    temp_min: temp_min.get(i).ok_or_else(|| null_at("temp_min", i))?,
                    temp_avg: temp_avg.get(i).ok_or_else(|| null_at("temp_avg", i))?,
                    precip_total_diaria: precip
                        .get(i)
                        .ok_or_else(|| null_at("precip_total_diaria", i))?,
                })
            })
            .collect()
    }
}
