//! # Logistics Engine
//!
//! The two moving parts of the query-driven denormalization layer:
//!
//! - [`writer`]: the write fan-out engine, turning one logical event into
//!   one row per view that materializes it, with per-view batching and an
//!   explicit partial-failure contract
//! - [`router`]: the query router, selecting the one projection that can
//!   answer a filter combination from a single partition and returning a
//!   lazy record stream
//!
//! Both are stateless beyond an `Arc<SchemaRegistry>` and an
//! `Arc<dyn StoreSession>`, injected at construction — no ambient global
//! lookup — so they test against the in-memory store in
//! `logistics-testing` unchanged.

pub mod router;
pub mod writer;

mod rows;

pub use router::{
    OrderStream, ProductStream, QueryError, QueryRouter, ShipmentFilters, ShipmentStream,
};
pub use writer::{FanOutError, FanOutWriter, ViewFailure, BATCH_CAPACITY};
