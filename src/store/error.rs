use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open record store '{0}'")]
    Unavailable(PathBuf, #[source] rusqlite::Error),

    #[error("'{0}' is not a valid table name")]
    InvalidTableName(String),

    #[error("Failed to read table '{table}'")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to append record to table '{table}'")]
    Insert {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to serialize payload for table '{0}'")]
    PayloadEncode(String, #[source] serde_json::Error),
}
