//! The pipeline entry point: read one capture table, decode and clean it, derive the
//! hourly, current and daily-statistics views, and export each to a CSV snapshot.
//!
//! A run is synchronous and runs to completion. Each table is read once into memory;
//! the three views are independent functions of that batch.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::export::exporter::{SnapshotExporter, SnapshotReader};
use crate::frames::ViewFrame;
use crate::schema::decoder::{decode_batch, DecodeFailure};
use crate::store::record_store::RecordStore;
use crate::store::sqlite::SqliteRecordStore;
use crate::transform::cleaning::drop_incomplete;
use crate::transform::{derive_views, DerivedViews};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::path::PathBuf;

/// Views derived from one table, before export.
#[derive(Debug)]
pub struct TableViews {
    pub table: String,
    pub views: DerivedViews,
    /// Records skipped because their payload did not decode.
    pub failures: Vec<DecodeFailure>,
    /// Rows read from the store.
    pub records_read: usize,
    /// Records left after the required-field check.
    pub records_valid: usize,
}

impl TableViews {
    pub fn frames(&self) -> Result<Vec<ViewFrame>, PipelineError> {
        self.views
            .to_frames()
            .map_err(|source| PipelineError::Frame {
                table: self.table.clone(),
                source,
            })
    }
}

/// Outcome of exporting one table.
#[derive(Debug)]
pub struct TableRun {
    pub table: String,
    /// The exported frames, in [`crate::ViewKind::ALL`] order.
    pub frames: Vec<ViewFrame>,
    /// Snapshot files written, parallel to `frames`.
    pub exported: Vec<PathBuf>,
    pub failures: Vec<DecodeFailure>,
}

/// Runs the derivation pipeline against a [`RecordStore`].
///
/// Create one with [`WeatherPipeline::open`] to read the SQLite file named in the
/// configuration, or with [`WeatherPipeline::with_store`] for any other store.
///
/// # Examples
///
/// ```no_run
/// use chrono::Local;
/// use weather_silver::{PipelineConfig, WeatherPipeline};
///
/// # fn main() -> Result<(), weather_silver::PipelineError> {
/// let config = PipelineConfig::builder()
///     .database_path("data.db")
///     .silver_layer_path("data_output/silver_layer")
///     .build();
/// let pipeline = WeatherPipeline::open(config)?;
///
/// for run in pipeline.run(Local::now().naive_local())? {
///     for frame in &run.frames {
///         println!("{} ({} rows)\n{}", frame.kind, frame.height(), frame.preview(10));
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct WeatherPipeline<S: RecordStore = SqliteRecordStore> {
    store: S,
    config: PipelineConfig,
    exporter: SnapshotExporter,
}

impl WeatherPipeline<SqliteRecordStore> {
    /// Opens the SQLite store at `config.database_path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Store`] if the database does not exist or cannot be opened.
    pub fn open(config: PipelineConfig) -> Result<Self, PipelineError> {
        let store = SqliteRecordStore::open(&config.database_path)?;
        Ok(Self::with_store(store, config))
    }
}

impl<S: RecordStore> WeatherPipeline<S> {
    pub fn with_store(store: S, config: PipelineConfig) -> Self {
        let exporter = SnapshotExporter::new(config.silver_layer_path.clone());
        Self {
            store,
            config,
            exporter,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A reader over the snapshots this pipeline exports.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(self.exporter.output_directory())
    }

    /// Reads, decodes and cleans `table`, then derives its three views. Nothing is written.
    ///
    /// # Errors
    ///
    /// * [`PipelineError::Store`] if the table cannot be read. A missing table is not an
    ///   error; it yields empty views.
    /// * [`PipelineError::Schema`] if a payload does not decode and the configuration asks
    ///   for [`crate::DecodeMode::Strict`].
    pub fn derive(&self, table: &str) -> Result<TableViews, PipelineError> {
        let stored = self.store.read_all(table)?;
        let batch = decode_batch(&stored, self.config.decode_mode)?;
        if !batch.failures.is_empty() {
            warn!(
                "{} of {} records in '{}' failed to decode",
                batch.failures.len(),
                stored.len(),
                table
            );
        }

        let records = drop_incomplete(batch.records);
        let views = derive_views(&records, &self.config.transform);
        info!(
            "Table '{}': {} hourly rows, {} current row(s), {} stats rows from {} records",
            table,
            views.hourly.len(),
            views.current.iter().count(),
            views.daily_stats.len(),
            records.len()
        );

        Ok(TableViews {
            table: table.to_string(),
            views,
            failures: batch.failures,
            records_read: stored.len(),
            records_valid: records.len(),
        })
    }

    /// Derives `table` and exports every view as a snapshot stamped with `at`.
    pub fn run_table(&self, table: &str, at: NaiveDateTime) -> Result<TableRun, PipelineError> {
        let derived = self.derive(table)?;
        let mut frames = derived.frames()?;

        let mut exported = Vec::with_capacity(frames.len());
        for view in &mut frames {
            let logical_name = view.kind.logical_name(table);
            exported.push(self.exporter.export(&logical_name, &mut view.frame, at)?);
        }

        Ok(TableRun {
            table: derived.table,
            frames,
            exported,
            failures: derived.failures,
        })
    }

    /// Runs every configured table in order. The first fatal error aborts the run.
    pub fn run(&self, at: NaiveDateTime) -> Result<Vec<TableRun>, PipelineError> {
        self.config
            .tables
            .iter()
            .map(|table| self.run_table(table, at))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeMode;
    use crate::store::error::StoreError;
    use crate::store::record_store::StoredRecord;
    use crate::transform::{CurrentSelection, TransformOptions};
    use crate::types::rows::DailyStatsRow;
    use crate::types::view::ViewKind;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::path::Path;

    const TABLE: &str = "meteosource";

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, minute, 0)
            .unwrap()
    }

    fn seeded_store() -> Result<SqliteRecordStore, StoreError> {
        let store = SqliteRecordStore::in_memory()?;
        store.append(
            TABLE,
            &json!({
                "lat": "40.4N", "lon": "3.7W",
                "timestamp_captura": "2025-06-01 08:00:00",
                "current": null,
                "hourly": {"data": [
                    {"date": "2025-06-01T09:00:00", "weather": "sunny", "summary": "Sunny",
                     "temperature": 10, "precipitation": null},
                    {"date": "2025-06-01T10:00:00", "weather": "rain", "summary": "Rain",
                     "temperature": null, "precipitation": {"total": 2, "type": "rain"}}
                ]}
            }),
        )?;
        store.append(
            TABLE,
            &json!({
                "lat": "40.4N", "lon": "3.7W",
                "timestamp_captura": "2025-06-01 09:00:00",
                "current": {
                    "temperature": 20, "summary": "Clear", "icon": "x", "cloud_cover": 0.1,
                    "wind": {"speed": 5, "angle": 90, "dir": "E"},
                    "precipitation": {"total": 0, "type": "none"}
                },
                "hourly": {"data": [
                    {"date": "2025-06-01T10:00:00", "weather": "sunny", "summary": "Sunny",
                     "temperature": 30, "precipitation": {"total": 0, "type": "none"}}
                ]}
            }),
        )?;
        Ok(store)
    }

    fn config(out: &Path) -> PipelineConfig {
        PipelineConfig::builder()
            .tables(vec![TABLE.to_string()])
            .silver_layer_path(out)
            .build()
    }

    #[test]
    fn test_run_exports_three_snapshots() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let pipeline = WeatherPipeline::with_store(seeded_store()?, config(tmp.path()));

        let runs = pipeline.run(at(5))?;
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert!(run.failures.is_empty());

        let names: Vec<String> = run
            .exported
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        assert_eq!(
            names,
            vec![
                "meteosource_hourly_weather_20250601_1205.csv",
                "meteosource_current_weather_20250601_1205.csv",
                "meteosource_daily_stats_20250601_1205.csv",
            ]
        );

        let heights: Vec<usize> = run.frames.iter().map(ViewFrame::height).collect();
        assert_eq!(heights, vec![3, 1, 2]);

        let stats = pipeline
            .reader()
            .load_latest(TABLE, ViewKind::DailyStats)?
            .ok_or("stats snapshot missing")?;
        assert_eq!(
            DailyStatsRow::from_frame(&stats)?,
            vec![
                DailyStatsRow {
                    id: 1,
                    temp_max: 10.0,
                    temp_min: 10.0,
                    temp_avg: 10.0,
                    precip_total_diaria: 2.0,
                },
                DailyStatsRow {
                    id: 2,
                    temp_max: 30.0,
                    temp_min: 30.0,
                    temp_avg: 30.0,
                    precip_total_diaria: 0.0,
                },
            ]
        );

        let current = std::fs::read_to_string(&run.exported[1])?;
        let mut lines = current.lines();
        assert_eq!(
            lines.next(),
            Some("capture_timestamp,temperature,summary,icon,cloud_cover,precip_total,precip_type,wind_speed,wind_angle,wind_dir")
        );
        let row = lines.next().ok_or("current row missing")?;
        assert!(row.starts_with("2025-06-01 09:00:00,"));
        assert!(row.ends_with(",none,5.0,90,E"));
        Ok(())
    }

    #[test]
    fn test_rerun_produces_identical_content() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let pipeline = WeatherPipeline::with_store(seeded_store()?, config(tmp.path()));

        let first = pipeline.run_table(TABLE, at(1))?;
        let second = pipeline.run_table(TABLE, at(2))?;
        for (a, b) in first.exported.iter().zip(&second.exported) {
            assert_ne!(a, b);
            assert_eq!(std::fs::read(a)?, std::fs::read(b)?);
        }
        Ok(())
    }

    #[test]
    fn test_missing_table_exports_empty_views() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let pipeline =
            WeatherPipeline::with_store(SqliteRecordStore::in_memory()?, config(tmp.path()));

        let run = pipeline.run_table("openmeteo", at(0))?;
        assert!(run.frames.iter().all(|f| f.height() == 0));
        for path in &run.exported {
            assert_eq!(std::fs::read_to_string(path)?.lines().count(), 1);
        }
        Ok(())
    }

    #[test]
    fn test_bad_payload_is_isolated_or_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let store = seeded_store()?;
        store.append(TABLE, &json!({"timestamp_captura": "x", "current": {"temperature": "hot"}}))?;

        let isolated = WeatherPipeline::with_store(&store, config(tmp.path()));
        let derived = isolated.derive(TABLE)?;
        assert_eq!(derived.records_read, 3);
        assert_eq!(derived.records_valid, 2);
        assert_eq!(derived.failures.len(), 1);
        assert_eq!(derived.failures[0].id, Some(3));

        let strict_config = PipelineConfig::builder()
            .silver_layer_path(tmp.path())
            .decode_mode(DecodeMode::Strict)
            .build();
        let strict = WeatherPipeline::with_store(&store, strict_config);
        assert!(matches!(strict.derive(TABLE), Err(PipelineError::Schema(_))));
        Ok(())
    }

    #[test]
    fn test_records_without_timestamp_are_cleaned_out() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let store = seeded_store()?;
        store.append(
            TABLE,
            &json!({
                "current": {"temperature": 15.0},
                "hourly": {"data": [{"temperature": 15.0}]}
            }),
        )?;
        let pipeline = WeatherPipeline::with_store(&store, config(tmp.path()));
        let derived = pipeline.derive(TABLE)?;

        assert_eq!(derived.records_valid, 2);
        assert!(derived.views.hourly.iter().all(|r| r.id != 3));
        assert!(derived.views.daily_stats.iter().all(|r| r.id != 3));
        let current = derived.views.current.ok_or("current row missing")?;
        assert_eq!(current.temperature, Some(20.0));
        Ok(())
    }

    #[test]
    fn test_current_only_selection_reaches_records_without_forecast(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let store = seeded_store()?;
        store.append(
            TABLE,
            &json!({"timestamp_captura": "2025-06-01 10:00:00", "current": {"temperature": 22.0}}),
        )?;

        let coupled = WeatherPipeline::with_store(&store, config(tmp.path()));
        let row = coupled.derive(TABLE)?.views.current.ok_or("no current row")?;
        assert_eq!(row.temperature, Some(20.0));

        let decoupled_config = PipelineConfig::builder()
            .silver_layer_path(tmp.path())
            .transform(TransformOptions {
                current_selection: CurrentSelection::CurrentOnly,
                ..Default::default()
            })
            .build();
        let decoupled = WeatherPipeline::with_store(&store, decoupled_config);
        let row = decoupled.derive(TABLE)?.views.current.ok_or("no current row")?;
        assert_eq!(row.temperature, Some(22.0));
        Ok(())
    }

    struct FailingStore;

    impl RecordStore for FailingStore {
        fn read_all(&self, table: &str) -> Result<Vec<StoredRecord>, StoreError> {
            Err(StoreError::InvalidTableName(table.to_string()))
        }
    }

    #[test]
    fn test_store_errors_abort_the_run() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let pipeline = WeatherPipeline::with_store(FailingStore, config(tmp.path()));
        assert!(matches!(pipeline.run(at(0)), Err(PipelineError::Store(_))));
        assert_eq!(std::fs::read_dir(tmp.path())?.count(), 0);
        Ok(())
    }
}
