use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create output directory '{0}'")]
    DirectoryCreation(PathBuf, #[source] std::io::Error),

    #[error("Output path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to list output directory '{0}'")]
    DirectoryRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to create snapshot file '{0}'")]
    FileCreate(PathBuf, #[source] std::io::Error),

    #[error("Failed to write CSV snapshot '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),

    #[error("Failed to read CSV snapshot '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),
}
