//! Write fan-out engine.
//!
//! # Overview
//!
//! One logical shipment event becomes four physical rows, one per shipment
//! view, each keyed by that view's own partition/clustering scheme but
//! carrying an identical payload. Orders and product lines have exactly one
//! view each, so they are plain single-view writes.
//!
//! The backing store offers no cross-view atomicity. The engine therefore
//! models fan-out as best-effort replication: views that persisted stay
//! persisted, views that failed are named precisely in [`FanOutError`], and
//! re-submitting the same event is safe because events carry their temporal
//! keys — a retry rewrites identical rows instead of minting divergent ones.

use crate::rows;
use logistics_core::schema::{SchemaRegistry, View};
use logistics_core::store::{Batch, Insert, Row, StoreError, StoreSession};
use logistics_core::types::{OrderEvent, OrderNumber, ProductLineEvent, ShipmentEvent};
use std::sync::Arc;

/// Operations per physical batch submission.
pub const BATCH_CAPACITY: usize = 10;

/// One shipment view that failed to persist during fan-out.
#[derive(Debug)]
pub struct ViewFailure {
    /// The view whose write failed.
    pub view: View,
    /// Why it failed. For bulk writes a [`StoreError::Batch`] carries the
    /// global index of the first unwritten event, so a retry can be scoped.
    pub error: StoreError,
}

/// Error from a shipment fan-out.
///
/// Successfully written views are never rolled back; staleness between
/// views after a partial failure is a logged anomaly for an external
/// repair job to re-drive, not something the engine hides.
#[derive(Debug, thiserror::Error)]
pub enum FanOutError {
    /// Every shipment view rejected the write; nothing was persisted.
    #[error("shipment fan-out wrote no views ({} failed) for orders {orders:?}", .failures.len())]
    Total {
        /// Orders whose shipments were being recorded.
        orders: Vec<OrderNumber>,
        /// Per-view failure details.
        failures: Vec<ViewFailure>,
    },

    /// Some views were written and some were not.
    #[error(
        "shipment fan-out wrote {} of {} views for orders {orders:?}",
        .written.len(),
        .written.len() + .failures.len()
    )]
    Partial {
        /// Orders whose shipments were being recorded.
        orders: Vec<OrderNumber>,
        /// Views that persisted and are left in place.
        written: Vec<View>,
        /// Per-view failure details.
        failures: Vec<ViewFailure>,
    },
}

impl FanOutError {
    /// The views that failed to persist.
    #[must_use]
    pub fn failed_views(&self) -> Vec<View> {
        match self {
            Self::Total { failures, .. } | Self::Partial { failures, .. } => {
                failures.iter().map(|f| f.view).collect()
            }
        }
    }
}

/// Fans one logical event out to every view that materializes it.
///
/// Stateless beyond the registry and session references; safe to share
/// across tasks.
#[derive(Clone)]
pub struct FanOutWriter {
    registry: Arc<SchemaRegistry>,
    session: Arc<dyn StoreSession>,
}

impl FanOutWriter {
    /// Create a writer over a shared registry and store session.
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>, session: Arc<dyn StoreSession>) -> Self {
        Self { registry, session }
    }

    /// Record one order into its single view.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails; the core does not retry.
    pub async fn record_order(&self, event: &OrderEvent) -> Result<(), StoreError> {
        self.write_view(View::OrdersByCustomer, &[rows::encode_order(event)])
            .await?;
        tracing::debug!(order = %event.order_number, customer = %event.customer_email, "order recorded");
        Ok(())
    }

    /// Record a batch of orders, submitted in groups of [`BATCH_CAPACITY`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Batch`] carrying the index of the first
    /// unwritten event so a retry can resume from it.
    pub async fn record_orders(&self, events: &[OrderEvent]) -> Result<(), StoreError> {
        let rows: Vec<Row> = events.iter().map(rows::encode_order).collect();
        self.write_view(View::OrdersByCustomer, &rows).await
    }

    /// Record one product line into its single view.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn record_product_line(&self, event: &ProductLineEvent) -> Result<(), StoreError> {
        self.write_view(View::ProductsByOrder, &[rows::encode_product_line(event)])
            .await
    }

    /// Record a batch of product lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Batch`] with the first unwritten index.
    pub async fn record_product_lines(
        &self,
        events: &[ProductLineEvent],
    ) -> Result<(), StoreError> {
        let rows: Vec<Row> = events.iter().map(rows::encode_product_line).collect();
        self.write_view(View::ProductsByOrder, &rows).await
    }

    /// Record one shipment into all four shipment views.
    ///
    /// # Errors
    ///
    /// Returns [`FanOutError`] naming exactly which views failed;
    /// successfully written views stay in place.
    pub async fn record_shipment(&self, event: &ShipmentEvent) -> Result<(), FanOutError> {
        self.record_shipments(std::slice::from_ref(event)).await
    }

    /// Record a batch of shipments into all four shipment views.
    ///
    /// Each view gets its own sequence of batches (capacity
    /// [`BATCH_CAPACITY`]); batches never span views, and a failure in one
    /// view does not stop the others from being attempted.
    ///
    /// # Errors
    ///
    /// Returns [`FanOutError`] naming the failed views and affected orders.
    pub async fn record_shipments(&self, events: &[ShipmentEvent]) -> Result<(), FanOutError> {
        if events.is_empty() {
            return Ok(());
        }
        let rows: Vec<Row> = events.iter().map(rows::encode_shipment).collect();

        let mut written = Vec::new();
        let mut failures = Vec::new();
        for view in View::SHIPMENTS {
            match self.write_view(view, &rows).await {
                Ok(()) => written.push(view),
                Err(error) => {
                    tracing::warn!(
                        view = %view,
                        %error,
                        shipments = events.len(),
                        "shipment view write failed; sibling views are not rolled back"
                    );
                    failures.push(ViewFailure { view, error });
                }
            }
        }

        if failures.is_empty() {
            tracing::debug!(shipments = events.len(), "shipment fan-out complete");
            return Ok(());
        }

        let mut orders: Vec<OrderNumber> = Vec::new();
        for event in events {
            if !orders.contains(&event.order_number) {
                orders.push(event.order_number.clone());
            }
        }

        if written.is_empty() {
            Err(FanOutError::Total { orders, failures })
        } else {
            Err(FanOutError::Partial {
                orders,
                written,
                failures,
            })
        }
    }

    /// Write rows to one view, batching above a single row.
    ///
    /// Batch-local failure indices are remapped to the caller's row
    /// numbering.
    async fn write_view(&self, view: View, rows: &[Row]) -> Result<(), StoreError> {
        let table = self.registry.table(view).name();
        if let [row] = rows {
            return self.session.insert(Insert {
                table: table.to_string(),
                row: row.clone(),
            })
            .await;
        }

        for (chunk_index, chunk) in rows.chunks(BATCH_CAPACITY).enumerate() {
            self.session
                .submit_batch(Batch {
                    table: table.to_string(),
                    rows: chunk.to_vec(),
                })
                .await
                .map_err(|error| match error {
                    StoreError::Batch { index, reason } => StoreError::Batch {
                        index: chunk_index * BATCH_CAPACITY + index,
                        reason,
                    },
                    other => other,
                })?;
            tracing::trace!(table, rows = chunk.len(), "batch submitted");
        }
        Ok(())
    }
}
