//! Distance persistence for zipdist
//!
//! SQLite-backed store keyed on the ordered (zip1, zip2) pair. The engine
//! depends on three store guarantees only: bulk key pre-fetch, batched
//! insert with duplicate keys ignored, and durability of a committed batch.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};
use rusqlite::{params, Connection};

use crate::core::error::{Error, Result};

/// Table holding computed distances
pub const RESULTS_TABLE: &str = "calculated_distances";

/// A computed pair distance, keyed exactly as written
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRecord {
    pub zip1: String,
    pub zip2: String,
    pub distance_km: f64,
}

/// Handle to the persisted distance table
pub struct DistanceStore {
    conn: Connection,
}

impl DistanceStore {
    /// Open (creating if needed) a distance store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory store, mainly for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {RESULTS_TABLE} (
                    zip1 TEXT NOT NULL,
                    zip2 TEXT NOT NULL,
                    distance_km REAL NOT NULL,
                    PRIMARY KEY (zip1, zip2)
                )"
            ),
            [],
        )?;
        Ok(Self { conn })
    }

    /// Bulk pre-fetch of every stored (zip1, zip2) key.
    ///
    /// One query, O(existing rows); this is what keeps a resumed run from
    /// degenerating into one store round-trip per enumerated pair.
    pub fn completed_keys(&self) -> Result<HashSet<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT zip1, zip2 FROM {RESULTS_TABLE}"))?;
        let keys = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        debug!("Pre-fetched {} completed keys", keys.len());
        Ok(keys)
    }

    /// Number of stored distance records
    pub fn len(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {RESULTS_TABLE}"), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Fetch a stored distance by its exact key order, if present
    pub fn get(&self, zip1: &str, zip2: &str) -> Result<Option<f64>> {
        use rusqlite::OptionalExtension;
        let distance = self
            .conn
            .query_row(
                &format!("SELECT distance_km FROM {RESULTS_TABLE} WHERE zip1 = ?1 AND zip2 = ?2"),
                params![zip1, zip2],
                |row| row.get(0),
            )
            .optional()?;
        Ok(distance)
    }

    /// Commit a batch of records in one transaction.
    ///
    /// Duplicate keys are ignored rather than treated as errors, so the
    /// non-conflicting members of the batch still make forward progress.
    /// Returns the number of rows actually inserted. Once this returns Ok,
    /// every record in the batch is durably visible to `completed_keys`.
    pub fn insert_batch(&mut self, records: &[DistanceRecord]) -> Result<usize> {
        for record in records {
            if !record.distance_km.is_finite() {
                return Err(Error::StorageError(format!(
                    "non-finite distance for ({}, {})",
                    record.zip1, record.zip2
                )));
            }
        }

        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT OR IGNORE INTO {RESULTS_TABLE} (zip1, zip2, distance_km) VALUES (?1, ?2, ?3)"
            ))?;
            for record in records {
                inserted += stmt.execute(params![record.zip1, record.zip2, record.distance_km])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }
}

/// Accumulates computed records and commits them in bounded-size batches
pub struct BatchWriter<'a> {
    store: &'a mut DistanceStore,
    pending: Vec<DistanceRecord>,
    batch_size: usize,
    committed: u64,
    inserted: u64,
}

impl<'a> BatchWriter<'a> {
    pub fn new(store: &'a mut DistanceStore, batch_size: usize) -> Self {
        Self {
            store,
            pending: Vec::new(),
            batch_size: batch_size.max(1),
            committed: 0,
            inserted: 0,
        }
    }

    /// Queue a record, committing automatically once the batch fills up
    pub fn push(&mut self, record: DistanceRecord) -> Result<()> {
        self.pending.push(record);
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Commit whatever is pending; a no-op on an empty buffer
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let batch_len = self.pending.len();
        let inserted = self.store.insert_batch(&self.pending)?;
        if inserted < batch_len {
            info!(
                "Batch commit: {} of {} rows were already present",
                batch_len - inserted,
                batch_len
            );
        }
        self.committed += batch_len as u64;
        self.inserted += inserted as u64;
        self.pending.clear();
        Ok(())
    }

    /// Records handed to committed batches so far
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// Rows actually inserted (committed minus duplicate no-ops)
    pub fn inserted(&self) -> u64 {
        self.inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(zip1: &str, zip2: &str, distance_km: f64) -> DistanceRecord {
        DistanceRecord {
            zip1: zip1.to_string(),
            zip2: zip2.to_string(),
            distance_km,
        }
    }

    #[test]
    fn test_open_creates_schema() {
        let store = DistanceStore::open_in_memory().unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.completed_keys().unwrap().is_empty());
    }

    #[test]
    fn test_insert_batch_and_prefetch_roundtrip() {
        let mut store = DistanceStore::open_in_memory().unwrap();
        let inserted = store
            .insert_batch(&[record("A", "B", 1.5), record("A", "C", 2.5)])
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.len().unwrap(), 2);

        let keys = store.completed_keys().unwrap();
        assert!(keys.contains(&("A".to_string(), "B".to_string())));
        assert!(keys.contains(&("A".to_string(), "C".to_string())));
        assert!(!keys.contains(&("B".to_string(), "A".to_string())));
    }

    #[test]
    fn test_duplicate_key_is_ignored_not_fatal() {
        let mut store = DistanceStore::open_in_memory().unwrap();
        store.insert_batch(&[record("A", "B", 1.5)]).unwrap();

        // Same key again, e.g. from a racing second run
        let inserted = store.insert_batch(&[record("A", "B", 99.9)]).unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(store.len().unwrap(), 1);
        // First write wins; duplicates never overwrite
        assert_eq!(store.get("A", "B").unwrap(), Some(1.5));
    }

    #[test]
    fn test_conflicting_member_does_not_block_rest_of_batch() {
        let mut store = DistanceStore::open_in_memory().unwrap();
        store.insert_batch(&[record("A", "B", 1.5)]).unwrap();

        let inserted = store
            .insert_batch(&[
                record("A", "B", 1.5),
                record("A", "C", 2.5),
                record("B", "C", 3.5),
            ])
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_non_finite_distance_is_storage_error() {
        let mut store = DistanceStore::open_in_memory().unwrap();
        let err = store
            .insert_batch(&[record("A", "B", f64::INFINITY)])
            .unwrap_err();
        assert!(matches!(err, Error::StorageError(_)));
        assert!(store.is_empty().unwrap());

        let err = store.insert_batch(&[record("A", "B", f64::NAN)]).unwrap_err();
        assert!(matches!(err, Error::StorageError(_)));
    }

    #[test]
    fn test_batch_writer_flushes_at_batch_size() {
        let mut store = DistanceStore::open_in_memory().unwrap();
        {
            let mut writer = BatchWriter::new(&mut store, 2);
            writer.push(record("A", "B", 1.0)).unwrap();
            assert_eq!(writer.committed(), 0);
            writer.push(record("A", "C", 2.0)).unwrap();
            assert_eq!(writer.committed(), 2);
            writer.push(record("B", "C", 3.0)).unwrap();
            assert_eq!(writer.committed(), 2);
            writer.flush().unwrap();
            assert_eq!(writer.committed(), 3);
            assert_eq!(writer.inserted(), 3);
        }
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_batch_writer_counts_duplicates_separately() {
        let mut store = DistanceStore::open_in_memory().unwrap();
        store.insert_batch(&[record("A", "B", 1.0)]).unwrap();

        let mut writer = BatchWriter::new(&mut store, 10);
        writer.push(record("A", "B", 1.0)).unwrap();
        writer.push(record("A", "C", 2.0)).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.committed(), 2);
        assert_eq!(writer.inserted(), 1);
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let mut store = DistanceStore::open_in_memory().unwrap();
        let mut writer = BatchWriter::new(&mut store, 0);
        writer.push(record("A", "B", 1.0)).unwrap();
        assert_eq!(writer.committed(), 1);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distances.sqlite");

        {
            let mut store = DistanceStore::open(&path).unwrap();
            store.insert_batch(&[record("A", "B", 1.5)]).unwrap();
        }

        let store = DistanceStore::open(&path).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("A", "B").unwrap(), Some(1.5));
    }
}
