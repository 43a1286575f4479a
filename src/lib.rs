mod config;
mod error;
mod export;
mod frames;
mod pipeline;
mod schema;
mod store;
mod transform;
mod types;
mod utils;

pub use config::*;
pub use error::PipelineError;
pub use pipeline::*;

pub use export::error::ExportError;
pub use export::exporter::{SnapshotExporter, SnapshotReader};
pub use frames::{current_frame, daily_stats_frame, hourly_frame, ViewFrame};

pub use schema::decoder::{decode_batch, decode_record, DecodeFailure, DecodedBatch};
pub use schema::error::SchemaError;

pub use store::error::StoreError;
pub use store::record_store::{RecordStore, StoredRecord};
pub use store::sqlite::SqliteRecordStore;

pub use transform::cleaning::{coerce_null_precipitation, drop_incomplete, exclude_null_temperature};
pub use transform::current::select_current;
pub use transform::error::TransformError;
pub use transform::explode::{explode_hourly, ExplodedHour};
pub use transform::hourly::{build_hourly_view, forward_fill};
pub use transform::stats::build_daily_stats;
pub use transform::{derive_views, CurrentSelection, DerivedViews, TemperatureBounds, TransformOptions};

pub use types::record::*;
pub use types::rows::*;
pub use types::view::ViewKind;

pub use utils::snapshot_stamp;
