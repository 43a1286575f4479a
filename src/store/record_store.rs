use crate::store::error::StoreError;

/// One raw row of a capture table, before the payload is decoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredRecord {
    pub id: Option<i64>,
    /// Capture time as written by ingestion into its own column. Informational only:
    /// decoding takes the capture time from the payload's `timestamp_captura` key.
    pub timestamp: Option<String>,
    /// JSON text of the capture.
    pub payload: Option<String>,
}

/// Read side of the capture store.
///
/// Implementations return every row of `table` ordered by ascending `id`. A table
/// that does not exist is "no data", not an error: it yields an empty vector.
pub trait RecordStore {
    fn read_all(&self, table: &str) -> Result<Vec<StoredRecord>, StoreError>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn read_all(&self, table: &str) -> Result<Vec<StoredRecord>, StoreError> {
        (**self).read_all(table)
    }
}

/// Checks that `table` can be interpolated into SQL as a bare identifier.
pub(crate) fn validate_table_name(table: &str) -> Result<(), StoreError> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(table.to_string()))
    }
}
