//! Query router.
//!
//! # Overview
//!
//! Each read pattern maps to exactly one projection, and the most specific
//! projection whose required columns are all present wins:
//!
//! | type | status | projection                            |
//! |------|--------|---------------------------------------|
//! | yes  | yes    | `shipments_by_order_type_status_date` |
//! | yes  | no     | `shipments_by_order_type_date`        |
//! | no   | yes    | `shipments_by_order_status_date`      |
//! | no   | no     | `shipments_by_order_date`             |
//!
//! A date range, when present, becomes an inclusive clustering-key range
//! via the temporal codec's day bounds; when absent the partition is
//! scanned whole in clustering order. The router never falls back to a
//! view lacking a supplied filter column, so filtering always happens
//! server-side on the selected predicate.
//!
//! Results are lazy, forward-only streams: pages are pulled from the store
//! cursor only as the consumer advances, and an abandoned stream fetches
//! nothing further.

use crate::rows;
use async_stream::try_stream;
use chrono::NaiveDate;
use futures::stream::BoxStream;
use logistics_core::schema::{SchemaRegistry, View};
use logistics_core::store::{Row, RowCursor, Scan, StoreError, StoreSession, Value};
use logistics_core::temporal::TemporalKey;
use logistics_core::types::{
    DateRange, Email, OrderNumber, OrderRecord, ProductRecord, ShipmentRecord, ShipmentStatus,
    ShipmentType, ValidationError,
};
use std::sync::Arc;

/// Error from a routed query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Caller supplied an out-of-enumeration filter or malformed date;
    /// raised before any store call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A persisted row did not decode against the declared layout.
    #[error("corrupt row in {table}: {reason}")]
    Decode {
        /// Table the row came from.
        table: &'static str,
        /// What failed to decode.
        reason: String,
    },
}

/// Result type for routed queries.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Lazy sequence of shipment records in the selected view's clustering
/// order.
pub type ShipmentStream = BoxStream<'static, Result<ShipmentRecord>>;
/// Lazy sequence of order records, newest order first.
pub type OrderStream = BoxStream<'static, Result<OrderRecord>>;
/// Lazy sequence of product records, by product name.
pub type ProductStream = BoxStream<'static, Result<ProductRecord>>;

/// Recognized filter combination for shipment queries.
///
/// All fields are optional; the populated combination decides which
/// projection serves the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipmentFilters {
    /// Delivery class to match exactly.
    pub ship_type: Option<ShipmentType>,
    /// Status to match exactly.
    pub status: Option<ShipmentStatus>,
    /// Inclusive calendar date range on the shipment date.
    pub date_range: Option<DateRange>,
}

impl ShipmentFilters {
    /// No filtering: the whole order partition, newest shipment first.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            ship_type: None,
            status: None,
            date_range: None,
        }
    }

    /// Filter by delivery class.
    #[must_use]
    pub const fn with_type(mut self, ship_type: ShipmentType) -> Self {
        self.ship_type = Some(ship_type);
        self
    }

    /// Filter by status.
    #[must_use]
    pub const fn with_status(mut self, status: ShipmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Bound by an inclusive date range.
    #[must_use]
    pub const fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Validate raw filter text against the fixed enumerations.
    ///
    /// A half-specified date range (only start or only end) is treated as
    /// no range filter at all; the codec has no open-ended bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for unrecognized enum text or an
    /// inverted range — before any store call is made.
    pub fn parse(
        ship_type: Option<&str>,
        status: Option<&str>,
        dates: (Option<NaiveDate>, Option<NaiveDate>),
    ) -> std::result::Result<Self, ValidationError> {
        let ship_type = ship_type.map(str::parse).transpose()?;
        let status = status.map(str::parse).transpose()?;
        let date_range = match dates {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            _ => None,
        };
        Ok(Self {
            ship_type,
            status,
            date_range,
        })
    }

    /// The projection this filter combination routes to.
    #[must_use]
    pub const fn view(&self) -> View {
        match (self.ship_type.is_some(), self.status.is_some()) {
            (true, true) => View::ShipmentsByOrderTypeStatusDate,
            (true, false) => View::ShipmentsByOrderTypeDate,
            (false, true) => View::ShipmentsByOrderStatusDate,
            (false, false) => View::ShipmentsByOrderDate,
        }
    }
}

/// Routes each read to the one projection that can answer it from a
/// single partition.
///
/// Stateless beyond the registry and session references; safe to share
/// across tasks.
#[derive(Clone)]
pub struct QueryRouter {
    registry: Arc<SchemaRegistry>,
    session: Arc<dyn StoreSession>,
}

impl QueryRouter {
    /// Create a router over a shared registry and store session.
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>, session: Arc<dyn StoreSession>) -> Self {
        Self { registry, session }
    }

    /// Find an order's shipments under the given filter combination.
    ///
    /// An order with no rows in the selected projection yields an empty
    /// stream, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] if the cursor cannot be opened.
    pub async fn find_shipments(
        &self,
        order_number: &OrderNumber,
        filters: &ShipmentFilters,
    ) -> Result<ShipmentStream> {
        let view = filters.view();
        let table = self.registry.table(view).name();

        let mut clustering_prefix = Vec::new();
        if let Some(ship_type) = filters.ship_type {
            clustering_prefix.push(Value::Text(ship_type.as_str().to_string()));
        }
        if let Some(status) = filters.status {
            clustering_prefix.push(Value::Text(status.as_str().to_string()));
        }
        let range = filters.date_range.map(|range| {
            (
                Value::Temporal(TemporalKey::lower_bound(range.start())),
                Value::Temporal(TemporalKey::upper_bound(range.end())),
            )
        });

        tracing::debug!(
            order = %order_number,
            view = %view,
            date_bounded = filters.date_range.is_some(),
            "routing shipment query"
        );

        let cursor = self
            .session
            .scan(Scan {
                table: table.to_string(),
                partition: vec![Value::Text(order_number.as_str().to_string())],
                clustering_prefix,
                range,
            })
            .await?;
        Ok(record_stream(cursor, table, rows::decode_shipment))
    }

    /// Find a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] if the cursor cannot be opened.
    pub async fn find_orders_by_customer(&self, email: &Email) -> Result<OrderStream> {
        let table = self.registry.table(View::OrdersByCustomer).name();
        tracing::debug!(customer = %email, "routing order query");
        let cursor = self
            .session
            .scan(Scan {
                table: table.to_string(),
                partition: vec![Value::Text(email.as_str().to_string())],
                clustering_prefix: Vec::new(),
                range: None,
            })
            .await?;
        Ok(record_stream(cursor, table, rows::decode_order))
    }

    /// Find an order's product lines, by product name.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] if the cursor cannot be opened.
    pub async fn find_products_by_order(&self, order_number: &OrderNumber) -> Result<ProductStream> {
        let table = self.registry.table(View::ProductsByOrder).name();
        tracing::debug!(order = %order_number, "routing product query");
        let cursor = self
            .session
            .scan(Scan {
                table: table.to_string(),
                partition: vec![Value::Text(order_number.as_str().to_string())],
                clustering_prefix: Vec::new(),
                range: None,
            })
            .await?;
        Ok(record_stream(cursor, table, rows::decode_product))
    }
}

/// Wrap a store cursor into a lazy record stream.
///
/// Pages are pulled only as the consumer advances; dropping the stream
/// abandons the cursor with no further I/O.
fn record_stream<T>(
    mut cursor: Box<dyn RowCursor>,
    table: &'static str,
    decode: fn(Row) -> std::result::Result<T, String>,
) -> BoxStream<'static, Result<T>>
where
    T: Send + 'static,
{
    Box::pin(try_stream! {
        while let Some(page) = cursor.next_page().await? {
            for row in page {
                let record = decode(row)
                    .map_err(|reason| QueryError::Decode { table, reason })?;
                yield record;
            }
        }
    })
}
