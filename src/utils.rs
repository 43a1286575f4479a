use crate::export::error::ExportError;
use chrono::NaiveDateTime;
use log::info;
use std::io;
use std::path::Path;

/// `strftime` pattern of the snapshot suffix: minute resolution.
pub const SNAPSHOT_STAMP_FORMAT: &str = "%Y%m%d_%H%M";

pub fn snapshot_stamp(at: NaiveDateTime) -> String {
    at.format(SNAPSHOT_STAMP_FORMAT).to_string()
}

pub fn ensure_dir_exists(path: &Path) -> Result<(), ExportError> {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(ExportError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            std::fs::create_dir_all(path)
                .map_err(|e| ExportError::DirectoryCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(ExportError::DirectoryCreation(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_snapshot_stamp_has_minute_resolution() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 59)
            .unwrap();
        assert_eq!(snapshot_stamp(at), "20250307_0905");
    }

    #[test]
    fn test_ensure_dir_exists() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let nested = tmp.path().join("data_output").join("silver_layer");
        ensure_dir_exists(&nested)?;
        assert!(nested.is_dir());
        // second call is a no-op
        ensure_dir_exists(&nested)?;

        let file = tmp.path().join("occupied");
        std::fs::write(&file, b"x")?;
        assert!(matches!(
            ensure_dir_exists(&file),
            Err(ExportError::NotADirectory(_))
        ));
        Ok(())
    }
}
