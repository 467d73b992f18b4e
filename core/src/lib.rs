//! # Logistics Core
//!
//! Foundation types for the logistics query-driven denormalization layer.
//!
//! The backing wide-column store answers each read pattern from a single
//! partition, with no secondary indexes. One logical shipment is therefore
//! kept as four independently keyed rows — one per access pattern — and
//! this crate supplies everything both sides of that bargain share:
//!
//! - [`schema`]: the projection schema registry, the single source of truth
//!   for partition keys, clustering order, and column layout
//! - [`temporal`]: the time-ordered clustering key codec and its day-range
//!   bounds
//! - [`types`]: domain values, write-path events, and read-path records
//! - [`store`]: the session trait the backing store is abstracted behind
//!
//! The write fan-out engine and the query router live in
//! `logistics-engine`; an in-memory store for tests lives in
//! `logistics-testing`.

pub mod schema;
pub mod store;
pub mod temporal;
pub mod types;

pub use schema::{SchemaError, SchemaRegistry, View};
pub use store::{StoreError, StoreSession};
pub use temporal::TemporalKey;
pub use types::ValidationError;
