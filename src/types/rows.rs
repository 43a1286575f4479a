//! Flat rows of the three derived views.

/// A row of the hourly view. Temperature is always present: rows still null after
/// forward-filling never make it into the view.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub id: i64,
    pub capture_timestamp: String,
    pub date: Option<String>,
    pub weather: Option<String>,
    pub summary: Option<String>,
    pub temperature: f64,
    pub precip_total: f64,
    pub precip_type: String,
}

/// The single row of the current-conditions view.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentRow {
    pub capture_timestamp: String,
    pub temperature: Option<f64>,
    pub summary: Option<String>,
    pub icon: Option<String>,
    pub cloud_cover: Option<f64>,
    pub precip_total: f64,
    pub precip_type: String,
    pub wind_speed: f64,
    pub wind_angle: i64,
    pub wind_dir: String,
}

/// Aggregates over the forecast hours of one capture.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatsRow {
    pub id: i64,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Mean temperature rounded to two decimals.
    pub temp_avg: f64,
    pub precip_total_diaria: f64,
}
