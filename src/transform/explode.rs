use crate::types::record::{HourEntry, ValidRecord};

/// One forecast hour replicated out of its capture, carrying the capture's identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplodedHour<'a> {
    pub id: i64,
    pub capture_timestamp: &'a str,
    pub entry: &'a HourEntry,
}

/// Emits one [`ExplodedHour`] per entry of every record's forecast list.
///
/// Records are visited in input order and hours in list order. Records without a
/// forecast list contribute nothing.
pub fn explode_hourly(records: &[ValidRecord]) -> Vec<ExplodedHour<'_>> {
    records
        .iter()
        .filter_map(|record| record.hourly.as_ref().map(|hours| (record, hours)))
        .flat_map(|(record, hours)| {
            hours.iter().map(move |entry| ExplodedHour {
                id: record.id,
                capture_timestamp: &record.capture_timestamp,
                entry,
            })
        })
        .collect()
}
