//! SQLite-backed capture store.
//!
//! Every provider writes into its own table shaped
//! `(id INTEGER PRIMARY KEY AUTOINCREMENT, timestamp TEXT, payload TEXT)`, where
//! `payload` holds the JSON capture. The pipeline only ever reads through
//! [`SqliteRecordStore::open`], which never creates or modifies the file.
//! [`SqliteRecordStore::open_or_create`] and [`SqliteRecordStore::append`] exist for
//! ingestion tooling and tests.

use crate::store::error::StoreError;
use crate::store::record_store::{validate_table_name, RecordStore, StoredRecord};
use log::{debug, info};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;

pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Opens the existing database file at `path` read-only.
    ///
    /// A missing file is [`StoreError::Unavailable`]; nothing is created on disk.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| StoreError::Unavailable(path.to_path_buf(), e))?;
        debug!("Opened record store at {} (read-only)", path.display());
        Ok(Self { conn })
    }

    /// Opens the database file at `path` for writing, creating it if needed.
    pub fn open_or_create(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Unavailable(path.to_path_buf(), e))?;
        debug!("Opened record store at {}", path.display());
        Ok(Self { conn })
    }

    /// A private, empty in-memory store.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Unavailable(":memory:".into(), e))?;
        Ok(Self { conn })
    }

    /// Appends one capture to `table`, creating the table on first use.
    ///
    /// The `timestamp` column is filled from the payload's `timestamp_captura` key.
    /// Returns the id the store assigned to the new row.
    pub fn append(&self, table: &str, payload: &serde_json::Value) -> Result<i64, StoreError> {
        validate_table_name(table)?;
        let insert_err = |source| StoreError::Insert {
            table: table.to_string(),
            source,
        };

        self.conn
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp TEXT,
                    payload TEXT
                )",
                table
            ))
            .map_err(insert_err)?;

        let timestamp = payload
            .get("timestamp_captura")
            .and_then(|value| value.as_str());
        let text = serde_json::to_string(payload)
            .map_err(|e| StoreError::PayloadEncode(table.to_string(), e))?;

        self.conn
            .execute(
                &format!("INSERT INTO {} (timestamp, payload) VALUES (?1, ?2)", table),
                params![timestamp, text],
            )
            .map_err(insert_err)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Names of every user table in the store, sorted.
    pub fn tables(&self) -> Result<Vec<String>, StoreError> {
        let query_err = |source| StoreError::Query {
            table: "sqlite_master".to_string(),
            source,
        };
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
            )
            .map_err(query_err)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;
        Ok(names)
    }

    fn table_exists(&self, table: &str) -> Result<bool, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map(|found| found.is_some())
    }
}

impl RecordStore for SqliteRecordStore {
    fn read_all(&self, table: &str) -> Result<Vec<StoredRecord>, StoreError> {
        validate_table_name(table)?;
        let query_err = |source| StoreError::Query {
            table: table.to_string(),
            source,
        };

        if !self.table_exists(table).map_err(query_err)? {
            info!("Table '{}' does not exist yet, treating it as empty", table);
            return Ok(Vec::new());
        }

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT id, timestamp, payload FROM {} ORDER BY id ASC",
                table
            ))
            .map_err(query_err)?;
        let records = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    payload: row.get(2)?,
                })
            })
            .map_err(query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;

        debug!("Read {} rows from table '{}'", records.len(), table);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_table_reads_as_empty() -> Result<(), Box<dyn std::error::Error>> {
        let store = SqliteRecordStore::in_memory()?;
        assert!(store.read_all("meteosource")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_append_then_read_in_id_order() -> Result<(), Box<dyn std::error::Error>> {
        let store = SqliteRecordStore::in_memory()?;
        let first = store.append("meteosource", &json!({"timestamp_captura": "2025-01-01 10:00"}))?;
        let second = store.append("meteosource", &json!({"lat": "40.4N"}))?;
        assert!(second > first);

        let rows = store.read_all("meteosource")?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, Some(first));
        assert_eq!(rows[0].timestamp.as_deref(), Some("2025-01-01 10:00"));
        assert_eq!(rows[1].id, Some(second));
        assert_eq!(rows[1].timestamp, None);

        let payload: serde_json::Value =
            serde_json::from_str(rows[1].payload.as_deref().unwrap_or_default())?;
        assert_eq!(payload["lat"], "40.4N");
        Ok(())
    }

    #[test]
    fn test_tables_lists_user_tables() -> Result<(), Box<dyn std::error::Error>> {
        let store = SqliteRecordStore::in_memory()?;
        store.append("openmeteo", &json!({}))?;
        store.append("meteosource", &json!({}))?;
        assert_eq!(store.tables()?, vec!["meteosource", "openmeteo"]);
        Ok(())
    }

    #[test]
    fn test_rejects_unsafe_table_name() -> Result<(), Box<dyn std::error::Error>> {
        let store = SqliteRecordStore::in_memory()?;
        let result = store.read_all("weather; DROP TABLE x");
        assert!(matches!(result, Err(StoreError::InvalidTableName(_))));
        Ok(())
    }

    #[test]
    fn test_open_missing_file_is_unavailable_and_creates_nothing(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("typo.db");

        let result = SqliteRecordStore::open(&path);
        assert!(matches!(result, Err(StoreError::Unavailable(_, _))));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_open_reads_what_open_or_create_wrote() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.db");

        let writer = SqliteRecordStore::open_or_create(&path)?;
        writer.append("meteosource", &json!({"timestamp_captura": "2025-01-01 10:00"}))?;
        drop(writer);

        let reader = SqliteRecordStore::open(&path)?;
        assert_eq!(reader.tables()?, vec!["meteosource"]);
        assert_eq!(reader.read_all("meteosource")?.len(), 1);
        assert!(matches!(
            reader.append("meteosource", &json!({})),
            Err(StoreError::Insert { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_open_fails_for_unreachable_path() {
        let result = SqliteRecordStore::open(Path::new("/nonexistent-dir/for/sure/data.db"));
        assert!(matches!(result, Err(StoreError::Unavailable(_, _))));
    }
}
