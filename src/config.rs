//! Run configuration. Everything the pipeline needs to locate its input and output is
//! passed in here; nothing is read from process-wide state.

use crate::transform::TransformOptions;
use bon::Builder;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "data.db";
pub const DEFAULT_SILVER_LAYER_PATH: &str = "data_output/silver_layer";
pub const DEFAULT_TABLE: &str = "meteosource";
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// How the schema decoder reacts to a payload that does not match the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Skip the record, keep it in the failure list and carry on.
    #[default]
    Isolate,
    /// Abort the whole run on the first bad record.
    Strict,
}

/// Configuration of one pipeline invocation.
///
/// # Examples
///
/// ```
/// use weather_silver::{DecodeMode, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .database_path("captures.db")
///     .tables(vec!["meteosource".to_string()])
///     .decode_mode(DecodeMode::Strict)
///     .build();
///
/// assert_eq!(config.silver_layer_path.to_str(), Some("data_output/silver_layer"));
/// assert_eq!(config.preview_rows, 10);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PipelineConfig {
    /// SQLite file holding the raw captures.
    #[builder(into, default = PathBuf::from(DEFAULT_DATABASE_PATH))]
    pub database_path: PathBuf,

    /// Capture tables to process, in order.
    #[builder(default = vec![DEFAULT_TABLE.to_string()])]
    pub tables: Vec<String>,

    /// Output directory for the exported snapshots.
    #[builder(into, default = PathBuf::from(DEFAULT_SILVER_LAYER_PATH))]
    pub silver_layer_path: PathBuf,

    #[builder(default)]
    pub decode_mode: DecodeMode,

    #[builder(default)]
    pub transform: TransformOptions,

    /// Number of rows shown by console previews.
    #[builder(default = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
