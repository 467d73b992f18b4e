//! Projection schema registry.
//!
//! # Overview
//!
//! Every read pattern in this system is answered by a single-partition,
//! range-scan-on-clustering-key query against exactly one physical table.
//! That only works if the write fan-out and the query router agree on each
//! table's partition key, clustering order, and column layout — the registry
//! is the one place that layout is declared, validated at startup, and never
//! mutated afterwards.
//!
//! One logical shipment is materialized as four rows, one per shipment view,
//! with identical payload columns and different keys. Adding a new access
//! pattern is a new [`TableSchema`] entry plus a router rule, not a schema
//! migration tool.

use std::fmt;

/// Error for a malformed projection declaration.
///
/// Fatal at startup; never recovered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A table declared no partition key columns.
    #[error("table {table}: partition key is empty")]
    EmptyPartitionKey {
        /// Offending table.
        table: String,
    },

    /// A partition or clustering key column is missing from the column list.
    #[error("table {table}: key column {column} is not in the column list")]
    UnknownKeyColumn {
        /// Offending table.
        table: String,
        /// Key column without a matching column declaration.
        column: String,
    },

    /// The same column was declared twice.
    #[error("table {table}: column {column} is declared twice")]
    DuplicateColumn {
        /// Offending table.
        table: String,
        /// Repeated column name.
        column: String,
    },
}

/// Sort direction of a clustering column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text.
    Text,
    /// Text constrained to a fixed enumeration, validated before writes.
    EnumText,
    /// Signed integer.
    Int,
    /// Fixed-point money, stored as integer cents.
    Money,
    /// Time-ordered unique identifier.
    TemporalId,
}

/// A column declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: &'static str,
    /// Semantic type.
    pub kind: ColumnKind,
}

/// A clustering key column with its sort direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringColumn {
    /// Column name; must appear in the table's column list.
    pub name: &'static str,
    /// Scan order within the partition.
    pub order: SortOrder,
}

/// Declared physical layout of one projection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: &'static str,
    partition_key: Vec<&'static str>,
    clustering_key: Vec<ClusteringColumn>,
    columns: Vec<Column>,
}

impl TableSchema {
    /// Declare a table, validating the key columns against the column list.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the partition key is empty, a key column
    /// is not in the column list, or a column is declared twice.
    pub fn new(
        name: &'static str,
        partition_key: Vec<&'static str>,
        clustering_key: Vec<ClusteringColumn>,
        columns: Vec<Column>,
    ) -> Result<Self, SchemaError> {
        if partition_key.is_empty() {
            return Err(SchemaError::EmptyPartitionKey {
                table: name.to_string(),
            });
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: name.to_string(),
                    column: column.name.to_string(),
                });
            }
        }

        let key_columns = partition_key
            .iter()
            .copied()
            .chain(clustering_key.iter().map(|c| c.name));
        for key in key_columns {
            if !columns.iter().any(|c| c.name == key) {
                return Err(SchemaError::UnknownKeyColumn {
                    table: name.to_string(),
                    column: key.to_string(),
                });
            }
        }

        Ok(Self {
            name,
            partition_key,
            clustering_key,
            columns,
        })
    }

    /// Table name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Columns that must all be supplied to address a single partition.
    #[must_use]
    pub fn partition_key(&self) -> &[&'static str] {
        &self.partition_key
    }

    /// Clustering columns in declaration order.
    #[must_use]
    pub fn clustering_key(&self) -> &[ClusteringColumn] {
        &self.clustering_key
    }

    /// Full column list in row layout order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Position of a column within the row layout.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// The logical views of the logistics domain, one per access pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Q1: orders under a customer partition, newest first.
    OrdersByCustomer,
    /// Q2: product lines under an order partition, by product name.
    ProductsByOrder,
    /// Q3.1/Q3.2: shipments by order, optionally date-bounded.
    ShipmentsByOrderDate,
    /// Q3.3: shipments by order and status, optionally date-bounded.
    ShipmentsByOrderStatusDate,
    /// Q3.4: shipments by order and type, optionally date-bounded.
    ShipmentsByOrderTypeDate,
    /// Q3.5: shipments by order, type and status, optionally date-bounded.
    ShipmentsByOrderTypeStatusDate,
}

impl View {
    /// The four shipment views every shipment event fans out to.
    pub const SHIPMENTS: [Self; 4] = [
        Self::ShipmentsByOrderDate,
        Self::ShipmentsByOrderStatusDate,
        Self::ShipmentsByOrderTypeDate,
        Self::ShipmentsByOrderTypeStatusDate,
    ];

    /// Physical table name backing the view.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::OrdersByCustomer => "orders_by_customer",
            Self::ProductsByOrder => "products_by_order",
            Self::ShipmentsByOrderDate => "shipments_by_order_date",
            Self::ShipmentsByOrderStatusDate => "shipments_by_order_status_date",
            Self::ShipmentsByOrderTypeDate => "shipments_by_order_type_date",
            Self::ShipmentsByOrderTypeStatusDate => "shipments_by_order_type_status_date",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Read-only registry of every projection table layout.
///
/// Built once at startup and shared behind an `Arc`; both the write
/// fan-out and the query router derive their keys and predicates from it.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    tables: Vec<(View, TableSchema)>,
}

impl SchemaRegistry {
    /// Build the registry for the logistics domain's six views.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if any declaration is malformed. With the
    /// declarations below that indicates a programming error, but the
    /// registry refuses to hand out schemas the store would misinterpret.
    pub fn logistics() -> Result<Self, SchemaError> {
        let text = |name| Column {
            name,
            kind: ColumnKind::Text,
        };
        let desc = |name| ClusteringColumn {
            name,
            order: SortOrder::Descending,
        };
        let asc = |name| ClusteringColumn {
            name,
            order: SortOrder::Ascending,
        };

        let shipment_columns = || {
            vec![
                text("order_number"),
                Column {
                    name: "shipment_date",
                    kind: ColumnKind::TemporalId,
                },
                text("tracking_number"),
                Column {
                    name: "status",
                    kind: ColumnKind::EnumText,
                },
                Column {
                    name: "ship_type",
                    kind: ColumnKind::EnumText,
                },
                Column {
                    name: "amount",
                    kind: ColumnKind::Money,
                },
                text("customer_name"),
            ]
        };

        let tables = vec![
            (
                View::OrdersByCustomer,
                TableSchema::new(
                    View::OrdersByCustomer.table_name(),
                    vec!["email"],
                    vec![desc("order_date")],
                    vec![
                        text("email"),
                        Column {
                            name: "order_date",
                            kind: ColumnKind::TemporalId,
                        },
                        text("name"),
                        text("order_number"),
                        Column {
                            name: "total_amount",
                            kind: ColumnKind::Money,
                        },
                        Column {
                            name: "status",
                            kind: ColumnKind::EnumText,
                        },
                    ],
                )?,
            ),
            (
                View::ProductsByOrder,
                TableSchema::new(
                    View::ProductsByOrder.table_name(),
                    vec!["order_number"],
                    vec![asc("product_name")],
                    vec![
                        text("order_number"),
                        text("product_name"),
                        text("category"),
                        Column {
                            name: "unit_price",
                            kind: ColumnKind::Money,
                        },
                        Column {
                            name: "quantity",
                            kind: ColumnKind::Int,
                        },
                    ],
                )?,
            ),
            (
                View::ShipmentsByOrderDate,
                TableSchema::new(
                    View::ShipmentsByOrderDate.table_name(),
                    vec!["order_number"],
                    vec![desc("shipment_date")],
                    shipment_columns(),
                )?,
            ),
            (
                View::ShipmentsByOrderStatusDate,
                TableSchema::new(
                    View::ShipmentsByOrderStatusDate.table_name(),
                    vec!["order_number"],
                    vec![asc("status"), desc("shipment_date")],
                    shipment_columns(),
                )?,
            ),
            (
                View::ShipmentsByOrderTypeDate,
                TableSchema::new(
                    View::ShipmentsByOrderTypeDate.table_name(),
                    vec!["order_number"],
                    vec![asc("ship_type"), desc("shipment_date")],
                    shipment_columns(),
                )?,
            ),
            (
                View::ShipmentsByOrderTypeStatusDate,
                TableSchema::new(
                    View::ShipmentsByOrderTypeStatusDate.table_name(),
                    vec!["order_number"],
                    vec![asc("ship_type"), asc("status"), desc("shipment_date")],
                    shipment_columns(),
                )?,
            ),
        ];

        Ok(Self { tables })
    }

    /// Layout of the table backing `view`.
    ///
    /// # Panics
    ///
    /// Never panics for registries built by [`SchemaRegistry::logistics`],
    /// which declares every [`View`].
    #[must_use]
    pub fn table(&self, view: View) -> &TableSchema {
        match self.tables.iter().find(|(v, _)| *v == view) {
            Some((_, schema)) => schema,
            // Every View is declared at construction.
            None => unreachable!("view {view} is missing from the registry"),
        }
    }

    /// All declared table layouts, for schema bootstrap.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter().map(|(_, schema)| schema)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn logistics_registry_declares_all_six_views() {
        let registry = SchemaRegistry::logistics().unwrap();
        assert_eq!(registry.tables().count(), 6);

        for view in View::SHIPMENTS {
            let table = registry.table(view);
            assert_eq!(table.partition_key(), ["order_number"]);
            // Identical payload layout across every shipment view.
            assert_eq!(
                table.columns(),
                registry.table(View::ShipmentsByOrderDate).columns()
            );
        }
    }

    #[test]
    fn shipment_views_cluster_date_descending_last() {
        let registry = SchemaRegistry::logistics().unwrap();
        for view in View::SHIPMENTS {
            let clustering = registry.table(view).clustering_key();
            let last = clustering.last().unwrap();
            assert_eq!(last.name, "shipment_date");
            assert_eq!(last.order, SortOrder::Descending);
        }
    }

    #[test]
    fn type_status_view_clusters_type_then_status_then_date() {
        let registry = SchemaRegistry::logistics().unwrap();
        let names: Vec<_> = registry
            .table(View::ShipmentsByOrderTypeStatusDate)
            .clustering_key()
            .iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["ship_type", "status", "shipment_date"]);
    }

    #[test]
    fn empty_partition_key_is_rejected() {
        let err = TableSchema::new(
            "broken",
            vec![],
            vec![],
            vec![Column {
                name: "a",
                kind: ColumnKind::Text,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyPartitionKey { .. }));
    }

    #[test]
    fn clustering_column_outside_column_list_is_rejected() {
        let err = TableSchema::new(
            "broken",
            vec!["a"],
            vec![ClusteringColumn {
                name: "missing",
                order: SortOrder::Ascending,
            }],
            vec![Column {
                name: "a",
                kind: ColumnKind::Text,
            }],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownKeyColumn {
                table: "broken".to_string(),
                column: "missing".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let err = TableSchema::new(
            "broken",
            vec!["a"],
            vec![],
            vec![
                Column {
                    name: "a",
                    kind: ColumnKind::Text,
                },
                Column {
                    name: "a",
                    kind: ColumnKind::Int,
                },
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }
}
