//! Writes view frames to timestamped CSV snapshots and finds them again.
//!
//! A snapshot is named `<logical-name>_<YYYYMMDD_HHMM>.csv`. Two exports of the same
//! view within one minute share a name and the later one overwrites the earlier file.

use crate::export::error::ExportError;
use crate::types::view::ViewKind;
use crate::utils::{ensure_dir_exists, snapshot_stamp, SNAPSHOT_STAMP_FORMAT};
use chrono::NaiveDateTime;
use log::{debug, info};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct SnapshotExporter {
    output_directory: PathBuf,
}

impl SnapshotExporter {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn snapshot_path(&self, logical_name: &str, at: NaiveDateTime) -> PathBuf {
        self.output_directory
            .join(format!("{}_{}.csv", logical_name, snapshot_stamp(at)))
    }

    /// Writes `frame` as a CSV snapshot with a header row, creating the output
    /// directory if needed. Returns the path written.
    pub fn export(
        &self,
        logical_name: &str,
        frame: &mut DataFrame,
        at: NaiveDateTime,
    ) -> Result<PathBuf, ExportError> {
        ensure_dir_exists(&self.output_directory)?;
        let path = self.snapshot_path(logical_name, at);
        if path.exists() {
            debug!("Overwriting snapshot {}", path.display());
        }

        let mut file = File::create(&path).map_err(|e| ExportError::FileCreate(path.clone(), e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(frame)
            .map_err(|e| ExportError::CsvWrite(path.clone(), e))?;

        info!("Exported {} rows to {}", frame.height(), path.display());
        Ok(path)
    }
}

/// Locates and loads exported snapshots by logical name.
pub struct SnapshotReader {
    directory: PathBuf,
}

impl SnapshotReader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path of the most recent snapshot for `logical_name`, if any exists.
    ///
    /// Files whose suffix is not a valid snapshot stamp are ignored, so
    /// `meteosource_daily_stats` never matches files of a longer logical name.
    pub fn latest(&self, logical_name: &str) -> Result<Option<PathBuf>, ExportError> {
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ExportError::DirectoryRead(self.directory.clone(), e)),
        };

        let prefix = format!("{}_", logical_name);
        let mut newest: Option<(NaiveDateTime, PathBuf)> = None;
        for entry in entries {
            let entry = entry.map_err(|e| ExportError::DirectoryRead(self.directory.clone(), e))?;
            let file_name = entry.file_name();
            let Some(stamp) = file_name
                .to_str()
                .and_then(|name| name.strip_prefix(&prefix))
                .and_then(|rest| rest.strip_suffix(".csv"))
            else {
                continue;
            };
            let Ok(at) = NaiveDateTime::parse_from_str(stamp, SNAPSHOT_STAMP_FORMAT) else {
                continue;
            };
            if newest.as_ref().map_or(true, |(best, _)| at > *best) {
                newest = Some((at, entry.path()));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }

    /// Reads a snapshot back using the fixed column types of `kind`.
    pub fn load(&self, kind: ViewKind, path: &Path) -> Result<DataFrame, ExportError> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_schema(Some(Arc::new(kind.schema())))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| ExportError::CsvRead(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| ExportError::CsvRead(path.to_path_buf(), e))
    }

    /// Loads the newest snapshot of `kind` for `table`, if one exists.
    pub fn load_latest(&self, table: &str, kind: ViewKind) -> Result<Option<DataFrame>, ExportError> {
        match self.latest(&kind.logical_name(table))? {
            Some(path) => self.load(kind, &path).map(Some),
            None => Ok(None),
        }
    }
}
