//! Turns stored rows into typed [`WeatherRecord`]s.
//!
//! Decoding is schema-directed: payload keys that are missing or `null` become `None`,
//! keys the schema does not know are ignored, and a value of the wrong primitive type
//! is a [`SchemaError`].

use crate::config::DecodeMode;
use crate::schema::error::SchemaError;
use crate::store::record_store::StoredRecord;
use crate::types::record::{Payload, WeatherRecord};
use log::warn;
use serde_json::Value;

/// A record that could not be decoded, kept for the run report.
#[derive(Debug)]
pub struct DecodeFailure {
    pub id: Option<i64>,
    pub error: SchemaError,
}

/// Outcome of decoding a whole table.
#[derive(Debug, Default)]
pub struct DecodedBatch {
    /// Successfully decoded records, in store order.
    pub records: Vec<WeatherRecord>,
    pub failures: Vec<DecodeFailure>,
}

/// Decodes a single stored row.
pub fn decode_record(stored: &StoredRecord) -> Result<WeatherRecord, SchemaError> {
    let id = stored.id;
    let Some(text) = stored.payload.as_deref() else {
        return Ok(WeatherRecord {
            id,
            ..Default::default()
        });
    };

    let value: Value =
        serde_json::from_str(text).map_err(|source| SchemaError::Mismatch { id, source })?;
    let payload = match value {
        Value::Null => Payload::default(),
        Value::Object(_) => {
            serde_json::from_value(value).map_err(|source| SchemaError::Mismatch { id, source })?
        }
        _ => return Err(SchemaError::NotAnObject { id }),
    };
    Ok(payload.into_record(id))
}

/// Decodes every row of a table.
///
/// With [`DecodeMode::Isolate`] a bad row is logged, recorded in
/// [`DecodedBatch::failures`] and skipped. With [`DecodeMode::Strict`] the first bad row
/// aborts the whole batch.
pub fn decode_batch(rows: &[StoredRecord], mode: DecodeMode) -> Result<DecodedBatch, SchemaError> {
    let mut batch = DecodedBatch::default();
    for stored in rows {
        match decode_record(stored) {
            Ok(record) => batch.records.push(record),
            Err(error) if mode == DecodeMode::Isolate => {
                warn!("Skipping undecodable record: {}", error);
                batch.failures.push(DecodeFailure {
                    id: stored.id,
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }
    Ok(batch)
}
