//! Store session boundary.
//!
//! # Overview
//!
//! The core treats the backing wide-column store as an external
//! collaborator behind [`StoreSession`]: idempotent schema creation,
//! positional-parameter writes, per-table batch submission, and a paged
//! cursor for partition scans. The wire protocol behind the trait is out of
//! scope; tests and the demo run against the in-memory implementation in
//! `logistics-testing`.
//!
//! Every method returns a boxed future so the session can be shared as
//! `Arc<dyn StoreSession>` across the write fan-out and the query router.
//!
//! # Semantics assumed of implementations
//!
//! - Each single-partition write or read is individually atomic; there is
//!   no multi-partition or multi-table atomicity.
//! - Writing a row whose full primary key equals an existing row's
//!   overwrites it (upsert).
//! - A batch touches exactly one table; a failed batch reports the index of
//!   the offending row so a retry can be scoped.

use crate::schema::TableSchema;
use crate::temporal::TemporalKey;
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Error from the backing store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Connectivity or timeout failure; propagated per-operation, never
    /// retried by the core.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Operation addressed a table that was never created.
    #[error("no such table: {0}")]
    NoSuchTable(String),

    /// A row did not match the table's declared layout.
    #[error("invalid row for table {table}: {reason}")]
    InvalidRow {
        /// Table the row was bound for.
        table: String,
        /// Shape mismatch description.
        reason: String,
    },

    /// A batch submission failed partway through.
    #[error("batch failed at index {index}: {reason}")]
    Batch {
        /// Index of the first failing row within the batch.
        index: usize,
        /// Failure description.
        reason: String,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A single cell value, mirroring [`crate::schema::ColumnKind`].
///
/// The derived total order is what clustering comparisons use; values of
/// the same kind compare naturally and the schema guarantees scans never
/// compare across kinds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Free or enumerated text.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Fixed-point money.
    Money(Money),
    /// Time-ordered identifier.
    Temporal(TemporalKey),
}

impl Value {
    /// Extract text, if this is a text value.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Extract an integer, if this is an integer value.
    #[must_use]
    pub fn into_int(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            _ => None,
        }
    }

    /// Extract a money amount, if this is a money value.
    #[must_use]
    pub fn into_money(self) -> Option<Money> {
        match self {
            Self::Money(amount) => Some(amount),
            _ => None,
        }
    }

    /// Extract a temporal key, if this is a temporal value.
    #[must_use]
    pub fn into_temporal(self) -> Option<TemporalKey> {
        match self {
            Self::Temporal(key) => Some(key),
            _ => None,
        }
    }
}

/// One projection row: cell values in the table's declared column order.
pub type Row = Vec<Value>;

/// A single-row write bound to one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    /// Target table.
    pub table: String,
    /// Cell values in declared column order.
    pub row: Row,
}

/// A bounded group of rows submitted together for throughput.
///
/// All rows target the same table; batch boundaries are a performance
/// concern only and carry no atomicity across tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Target table.
    pub table: String,
    /// Rows in declared column order.
    pub rows: Vec<Row>,
}

/// A single-partition read with optional clustering predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    /// Target table.
    pub table: String,
    /// Partition key values, one per declared partition key column.
    pub partition: Vec<Value>,
    /// Equality values for a leading prefix of the clustering key.
    pub clustering_prefix: Vec<Value>,
    /// Inclusive bounds on the clustering column following the prefix.
    pub range: Option<(Value, Value)>,
}

/// Paged cursor over the rows of one scan.
///
/// Pages are fetched only as the consumer asks for them, so an abandoned
/// cursor costs nothing beyond the pages already pulled.
pub trait RowCursor: Send {
    /// Fetch the next page of rows.
    ///
    /// Returns `None` once the scan is exhausted. An empty partition is an
    /// immediate `None`, indistinguishable from an exhausted one.
    fn next_page(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<Vec<Row>>>> + Send + '_>>;
}

/// Handle to the backing store, shared process-wide.
///
/// Acquired once at startup and injected into every component; nothing in
/// the core manages its lifecycle. Implementations must be safe for
/// concurrent use.
pub trait StoreSession: Send + Sync {
    /// Create the keyspace if it does not exist.
    fn create_keyspace(
        &self,
        keyspace: &str,
        replication_factor: u32,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Create a table from its declared layout if it does not exist.
    fn create_table(
        &self,
        schema: &TableSchema,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Write one row.
    fn insert(&self, insert: Insert) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Submit a bounded batch of rows against one table.
    ///
    /// On failure the error carries the index of the first failing row;
    /// earlier rows in the batch may have been persisted.
    fn submit_batch(&self, batch: Batch) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Open a paged cursor over one partition.
    fn scan(
        &self,
        scan: Scan,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn RowCursor>>> + Send + '_>>;
}
