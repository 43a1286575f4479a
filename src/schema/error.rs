use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Payload of record {} is not a JSON object", display_id(.id))]
    NotAnObject { id: Option<i64> },

    #[error("Payload of record {} does not match the weather schema: {source}", display_id(.id))]
    Mismatch {
        id: Option<i64>,
        #[source]
        source: serde_json::Error,
    },
}

impl SchemaError {
    /// Store id of the record that failed to decode, if it had one.
    pub fn record_id(&self) -> Option<i64> {
        match self {
            SchemaError::NotAnObject { id } | SchemaError::Mismatch { id, .. } => *id,
        }
    }
}

fn display_id(id: &Option<i64>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "<no id>".to_string(),
    }
}
