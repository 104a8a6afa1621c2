//! # redb-backed Submission Store
//!
//! An append-only log of submission records in a redb embedded database:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! Identifiers come from a counter in the metadata table that is read and
//! advanced inside the same write transaction as the insert, so concurrent
//! appends never share an id.

use crate::engine::DerivedMetrics;
use crate::formats::{record_from_bytes, record_to_bytes};
use crate::{ProgrammeInput, SubmissionRecord, WorkloadError};
use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for records: id(u64) -> framed record bytes
const SUBMISSIONS: TableDefinition<u64, &[u8]> = TableDefinition::new("submissions");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_ID_KEY: &str = "next_submission_id";

fn io_err(e: impl std::fmt::Display) -> WorkloadError {
    WorkloadError::IoError(e.to_string())
}

/// Durable, append-only store of submission records.
pub struct SubmissionStore {
    db: Database,
}

impl std::fmt::Debug for SubmissionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionStore").finish_non_exhaustive()
    }
}

impl SubmissionStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorkloadError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;
        Self::init(db)
    }

    /// A volatile store, for tests and dry runs.
    pub fn in_memory() -> Result<Self, WorkloadError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(io_err)?;
        Self::init(db)
    }

    fn init(db: Database) -> Result<Self, WorkloadError> {
        let write_txn = db.begin_write().map_err(io_err)?;
        {
            let _ = write_txn.open_table(SUBMISSIONS).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(Self { db })
    }

    /// Stamp and persist one submission, returning the stored record.
    pub fn append(
        &self,
        input: ProgrammeInput,
        metrics: DerivedMetrics,
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmissionRecord, WorkloadError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;

        let record = {
            let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;
            let id = meta
                .get(NEXT_ID_KEY)
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(1);

            let record = SubmissionRecord::new(id, submitted_at, input, metrics);
            let bytes = record_to_bytes(&record)?;

            let mut table = write_txn.open_table(SUBMISSIONS).map_err(io_err)?;
            table.insert(id, bytes.as_slice()).map_err(io_err)?;
            meta.insert(NEXT_ID_KEY, id.saturating_add(1))
                .map_err(io_err)?;
            record
        };

        write_txn.commit().map_err(io_err)?;
        Ok(record)
    }

    /// Fetch one record by id.
    pub fn get(&self, id: u64) -> Result<SubmissionRecord, WorkloadError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SUBMISSIONS).map_err(io_err)?;
        let guard = table
            .get(id)
            .map_err(io_err)?
            .ok_or(WorkloadError::NotFound(id))?;
        record_from_bytes(guard.value())
    }

    /// All records in id order.
    pub fn list(&self) -> Result<Vec<SubmissionRecord>, WorkloadError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SUBMISSIONS).map_err(io_err)?;

        let mut records = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            records.push(record_from_bytes(value.value())?);
        }
        Ok(records)
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64, WorkloadError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SUBMISSIONS).map_err(io_err)?;
        table.len().map_err(io_err)
    }
}

// =============================================================================
// TESTS
// =============================================================================
