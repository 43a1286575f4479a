use crate::export::error::ExportError;
use crate::schema::error::SchemaError;
use crate::store::error::StoreError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to build view frames for table '{table}'")]
    Frame {
        table: String,
        #[source]
        source: PolarsError,
    },
}
