//! Testing utilities for the logistics read models.
//!
//! Provides fast, deterministic infrastructure for exercising the write
//! fan-out and query router without a real wide-column store:
//! - [`MemoryStore`]: in-memory store honoring declared clustering order
//!   and upsert-on-key-collision semantics
//! - Failure injection per table, for partial fan-out scenarios
//! - A scan log, for asserting which view served a query

pub mod memory_store;

pub use memory_store::MemoryStore;
