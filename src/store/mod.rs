pub mod backend;
pub mod journal;
pub mod table;

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::models::record::{Record, REQUIRED_COLUMNS};

use backend::{Backend, CsvFile};
#[cfg(test)]
use backend::MemoryBackend;
use journal::Journal;
use table::{RowMap, Table};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only journal persistence over a single tabular resource.
///
/// Every operation reads the whole resource; `append` rewrites it in full.
/// Cycles within one process are serialised, other processes are not
/// coordinated with.
pub struct RecordStore {
    backend: Box<dyn Backend>,
    cycle: Mutex<()>,
}

impl RecordStore {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            cycle: Mutex::new(()),
        }
    }

    pub fn csv_file(path: impl Into<PathBuf>) -> Self {
        Self::new(CsvFile::new(path))
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    /// Loads the full table, backfilling absent required columns in memory.
    /// A missing resource loads as an empty table.
    pub fn load(&self) -> StoreResult<Journal> {
        let _cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);
        let table = self.read_table()?;
        Ok(Journal::from_table(table))
    }

    /// Read-modify-write: loads, reconciles, appends `record` as the last row
    /// and writes the whole table back. Returns the stored row.
    pub fn append(&self, record: &Record) -> StoreResult<RowMap> {
        let _cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);
        let mut table = self.read_table()?;

        let index = table.push_row(record.cells());
        self.backend.write(&table.to_csv()?)?;

        tracing::info!(
            resource = %self.backend.describe(),
            rows = table.len(),
            "Journal record appended"
        );

        Ok(table.row(index).unwrap_or_else(|| RowMap(Vec::new())))
    }

    /// Whether the resource can be read and parsed right now.
    pub fn probe(&self) -> StoreResult<()> {
        self.load().map(|_| ())
    }

    fn read_table(&self) -> StoreResult<Table> {
        let mut table = match self.backend.read()? {
            Some(bytes) => Table::from_csv(&bytes)?,
            None => {
                tracing::debug!(resource = %self.backend.describe(), "No journal yet, starting empty");
                Table::default()
            }
        };

        let added = table.reconcile(&REQUIRED_COLUMNS);
        tracing::debug!(
            resource = %self.backend.describe(),
            rows = table.len(),
            columns = table.columns().len(),
            backfilled = ?added,
            "Journal loaded"
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{columns, SpendCategory};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_load_missing_resource_is_empty_with_full_schema() {
        let store = RecordStore::in_memory();
        let journal = store.load().unwrap();

        assert!(journal.is_empty());
        assert_eq!(journal.table().columns(), REQUIRED_COLUMNS);
    }

    #[test]
    fn test_append_n_then_load_n_rows_with_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::csv_file(dir.path().join("health_log.csv"));

        for day in 1..=4 {
            let mut record = Record::at(at(day, 8));
            record.weight = Some(70.0 + day as f64);
            store.append(&record).unwrap();
        }

        let journal = store.load().unwrap();
        assert_eq!(journal.len(), 4);
        assert_eq!(journal.table().columns(), REQUIRED_COLUMNS);
        for row in journal.table().rows() {
            let names: Vec<&str> = row.0.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, REQUIRED_COLUMNS.to_vec());
        }
        let weights: Vec<_> = journal.entries().iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![Some(71.0), Some(72.0), Some(73.0), Some(74.0)]);
    }

    #[test]
    fn test_load_backfills_without_touching_existing_values() {
        let store = RecordStore::new(MemoryBackend::with_contents(
            "timestamp,weight,legacy\n2024-01-01 08:00,70,x\n2024-01-02 08:00,71,y\n",
        ));
        let journal = store.load().unwrap();
        let table = journal.table();

        assert_eq!(&table.columns()[..3], ["timestamp", "weight", "legacy"]);
        assert_eq!(table.columns().len(), REQUIRED_COLUMNS.len() + 1);
        let first = table.row(0).unwrap();
        assert_eq!(first.get("weight"), Some("70"));
        assert_eq!(first.get("legacy"), Some("x"));
        assert_eq!(first.get(columns::MOOD), None);
        assert_eq!(table.row(1).unwrap().get("legacy"), Some("y"));
    }

    #[test]
    fn test_load_does_not_persist_backfill() {
        let original = "timestamp,weight\n2024-01-01 08:00,70\n";
        let store = RecordStore::new(MemoryBackend::with_contents(original));
        store.load().unwrap();

        let raw = store.backend.read().unwrap().unwrap();
        assert_eq!(String::from_utf8(raw).unwrap(), original);
    }

    #[test]
    fn test_append_preserves_old_rows_and_extra_columns() {
        let store = RecordStore::new(MemoryBackend::with_contents(
            "timestamp,legacy,weight\n2024-01-01 08:00,kept,70\n",
        ));

        let mut record = Record::at(at(2, 9));
        record.mood = Some(4);
        record.spend_category = SpendCategory::Food;
        let stored = store.append(&record).unwrap();
        assert_eq!(stored.get(columns::TIMESTAMP), Some("2024-01-02 09:00"));
        assert_eq!(stored.get("legacy"), None);

        let raw = String::from_utf8(store.backend.read().unwrap().unwrap()).unwrap();
        let header = raw.lines().next().unwrap();
        assert!(header.starts_with("timestamp,legacy,weight,sleep_hours,mood"));

        let journal = store.load().unwrap();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal.table().row(0).unwrap().get("legacy"), Some("kept"));
        assert_eq!(journal.entries()[0].weight, Some(70.0));
        assert_eq!(journal.entries()[1].mood, Some(4.0));
        assert_eq!(journal.entries()[1].spend_category.as_deref(), Some("food"));
    }

    #[test]
    fn test_append_keeps_fields_beyond_the_header() {
        let store = RecordStore::new(MemoryBackend::with_contents(
            "timestamp,weight\n2024-01-01 08:00,70,EXTRA\n",
        ));
        store.append(&Record::at(at(2, 9))).unwrap();

        let raw = String::from_utf8(store.backend.read().unwrap().unwrap()).unwrap();
        assert!(raw.contains("EXTRA"), "surplus field lost: {raw}");

        let journal = store.load().unwrap();
        assert_eq!(journal.len(), 2);
        let first = journal.table().row(0).unwrap();
        assert_eq!(first.get("weight"), Some("70"));
        assert_eq!(first.get("unnamed_2"), Some("EXTRA"));
        assert_eq!(journal.table().row(1).unwrap().get("unnamed_2"), None);
    }

    #[test]
    fn test_corrupt_resource_is_an_error() {
        let store = RecordStore::new(MemoryBackend::with_contents(vec![0xff, 0xfe, b'\n', 0xff]));
        assert!(matches!(store.load(), Err(StoreError::Csv(_))));
        assert!(store.probe().is_err());
    }
}
