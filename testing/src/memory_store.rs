//! In-memory wide-column store.
//!
//! Implements [`StoreSession`] over hash maps and sorted vectors, close
//! enough to the real store's semantics for the contracts that matter here:
//! single-partition scans in declared clustering order, upsert on full-key
//! collision, per-table batches with indexed failure reporting, and paged
//! cursors. Also records every scanned table so tests can assert that the
//! router never touched a view lacking a supplied filter column.

#![allow(clippy::unwrap_used)] // Test infrastructure unwraps lock guards for simplicity.

use logistics_core::schema::{ColumnKind, SortOrder, TableSchema};
use logistics_core::store::{
    Batch, Insert, Result, Row, RowCursor, Scan, StoreError, StoreSession, Value,
};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

/// In-memory store with failure injection and a scan log.
///
/// Cloning yields another handle to the same underlying store, matching
/// the process-wide shared-session model.
///
/// # Example
///
/// ```
/// use logistics_core::schema::SchemaRegistry;
/// use logistics_core::store::StoreSession;
/// use logistics_testing::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let registry = SchemaRegistry::logistics()?;
/// for table in registry.tables() {
///     store.create_table(table).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct Inner {
    keyspace: Option<String>,
    tables: HashMap<String, Table>,
    failing: HashSet<String>,
    scans: Vec<String>,
}

#[derive(Debug)]
struct Table {
    schema: TableSchema,
    partitions: HashMap<Vec<Value>, Vec<PartitionRow>>,
}

#[derive(Debug)]
struct PartitionRow {
    clustering: Vec<Value>,
    row: Row,
}

/// Default rows per cursor page.
const DEFAULT_PAGE_SIZE: usize = 100;

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the cursor page size (for exercising paging behavior).
    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Make every operation against `table` fail with
    /// [`StoreError::Unavailable`] until [`MemoryStore::heal_table`].
    pub fn fail_table(&self, table: &str) {
        self.inner.write().unwrap().failing.insert(table.to_string());
    }

    /// Remove a failure injection.
    pub fn heal_table(&self, table: &str) {
        self.inner.write().unwrap().failing.remove(table);
    }

    /// Tables scanned so far, in scan order.
    #[must_use]
    pub fn scanned_tables(&self) -> Vec<String> {
        self.inner.read().unwrap().scans.clone()
    }

    /// Clear the scan log (for test isolation).
    pub fn clear_scan_log(&self) {
        self.inner.write().unwrap().scans.clear();
    }

    /// Total rows stored in `table`, across all partitions.
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.inner
            .read()
            .unwrap()
            .tables
            .get(table)
            .map_or(0, |t| t.partitions.values().map(Vec::len).sum())
    }

    /// Rows of one partition in clustering order (for assertions).
    #[must_use]
    pub fn partition_rows(&self, table: &str, partition: &[Value]) -> Vec<Row> {
        self.inner
            .read()
            .unwrap()
            .tables
            .get(table)
            .and_then(|t| t.partitions.get(partition))
            .map(|rows| rows.iter().map(|r| r.row.clone()).collect())
            .unwrap_or_default()
    }

    /// The keyspace created at bootstrap, if any.
    #[must_use]
    pub fn keyspace(&self) -> Option<String> {
        self.inner.read().unwrap().keyspace.clone()
    }

    fn check_available(inner: &Inner, table: &str) -> Result<()> {
        if inner.failing.contains(table) {
            return Err(StoreError::Unavailable(format!(
                "injected failure for table {table}"
            )));
        }
        Ok(())
    }
}

fn kind_matches(kind: ColumnKind, value: &Value) -> bool {
    matches!(
        (kind, value),
        (ColumnKind::Text | ColumnKind::EnumText, Value::Text(_))
            | (ColumnKind::Int, Value::Int(_))
            | (ColumnKind::Money, Value::Money(_))
            | (ColumnKind::TemporalId, Value::Temporal(_))
    )
}

/// Compare clustering tuples under the table's declared sort directions.
fn compare_clustering(schema: &TableSchema, a: &[Value], b: &[Value]) -> Ordering {
    for (column, (left, right)) in schema.clustering_key().iter().zip(a.iter().zip(b.iter())) {
        let ordering = match column.order {
            SortOrder::Ascending => left.cmp(right),
            SortOrder::Descending => right.cmp(left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

impl Table {
    fn key_values(&self, names: &[&str], row: &Row) -> Vec<Value> {
        names
            .iter()
            .filter_map(|name| self.schema.column_index(name))
            .map(|index| row[index].clone())
            .collect()
    }

    fn insert_row(&mut self, row: Row) -> Result<()> {
        let columns = self.schema.columns();
        if row.len() != columns.len() {
            return Err(StoreError::InvalidRow {
                table: self.schema.name().to_string(),
                reason: format!("expected {} values, got {}", columns.len(), row.len()),
            });
        }
        for (column, value) in columns.iter().zip(&row) {
            if !kind_matches(column.kind, value) {
                return Err(StoreError::InvalidRow {
                    table: self.schema.name().to_string(),
                    reason: format!("column {} received a mismatched value kind", column.name),
                });
            }
        }

        let partition = self.key_values(self.schema.partition_key(), &row);
        let clustering_names: Vec<&str> = self
            .schema
            .clustering_key()
            .iter()
            .map(|c| c.name)
            .collect();
        let clustering = self.key_values(&clustering_names, &row);

        let rows = self.partitions.entry(partition).or_default();
        let entry = PartitionRow { clustering, row };
        match rows.binary_search_by(|existing| {
            compare_clustering(&self.schema, &existing.clustering, &entry.clustering)
        }) {
            // Full-key collision overwrites, as the real store would.
            Ok(position) => rows[position] = entry,
            Err(position) => rows.insert(position, entry),
        }
        Ok(())
    }

    fn scan_rows(&self, scan: &Scan) -> Vec<Row> {
        let Some(rows) = self.partitions.get(&scan.partition) else {
            return Vec::new();
        };

        rows.iter()
            .filter(|entry| {
                let prefix_matches = scan
                    .clustering_prefix
                    .iter()
                    .zip(&entry.clustering)
                    .all(|(want, have)| want == have);
                if !prefix_matches || entry.clustering.len() < scan.clustering_prefix.len() {
                    return false;
                }
                match &scan.range {
                    None => true,
                    Some((low, high)) => entry
                        .clustering
                        .get(scan.clustering_prefix.len())
                        .is_some_and(|value| value >= low && value <= high),
                }
            })
            .map(|entry| entry.row.clone())
            .collect()
    }
}

struct MemoryCursor {
    pages: VecDeque<Vec<Row>>,
}

impl RowCursor for MemoryCursor {
    fn next_page(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<Vec<Row>>>> + Send + '_>> {
        let page = self.pages.pop_front();
        Box::pin(async move { Ok(page) })
    }
}

impl StoreSession for MemoryStore {
    fn create_keyspace(
        &self,
        keyspace: &str,
        _replication_factor: u32,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let keyspace = keyspace.to_string();
        Box::pin(async move {
            self.inner.write().unwrap().keyspace = Some(keyspace);
            Ok(())
        })
    }

    fn create_table(
        &self,
        schema: &TableSchema,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let schema = schema.clone();
        Box::pin(async move {
            let mut inner = self.inner.write().unwrap();
            inner
                .tables
                .entry(schema.name().to_string())
                .or_insert_with(|| Table {
                    schema,
                    partitions: HashMap::new(),
                });
            Ok(())
        })
    }

    fn insert(&self, insert: Insert) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.inner.write().unwrap();
            Self::check_available(&inner, &insert.table)?;
            let table = inner
                .tables
                .get_mut(&insert.table)
                .ok_or_else(|| StoreError::NoSuchTable(insert.table.clone()))?;
            table.insert_row(insert.row)
        })
    }

    fn submit_batch(&self, batch: Batch) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.inner.write().unwrap();
            Self::check_available(&inner, &batch.table).map_err(|e| StoreError::Batch {
                index: 0,
                reason: e.to_string(),
            })?;
            let table = inner
                .tables
                .get_mut(&batch.table)
                .ok_or_else(|| StoreError::NoSuchTable(batch.table.clone()))?;
            for (index, row) in batch.rows.into_iter().enumerate() {
                table.insert_row(row).map_err(|e| StoreError::Batch {
                    index,
                    reason: e.to_string(),
                })?;
            }
            Ok(())
        })
    }

    fn scan(
        &self,
        scan: Scan,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn RowCursor>>> + Send + '_>> {
        Box::pin(async move {
            let mut inner = self.inner.write().unwrap();
            inner.scans.push(scan.table.clone());
            Self::check_available(&inner, &scan.table)?;
            let table = inner
                .tables
                .get(&scan.table)
                .ok_or_else(|| StoreError::NoSuchTable(scan.table.clone()))?;

            let rows = table.scan_rows(&scan);
            let pages = rows
                .chunks(self.page_size.max(1))
                .map(<[Row]>::to_vec)
                .collect();
            Ok(Box::new(MemoryCursor { pages }) as Box<dyn RowCursor>)
        })
    }
}
