//! Time-ordered clustering key codec.
//!
//! # Overview
//!
//! Projection rows cluster chronologically, but two shipments on the same
//! order and the same calendar date must never collide (a collision would
//! silently overwrite a prior row under the store's upsert semantics).
//! [`TemporalKey`] therefore packs a millisecond timestamp with 80 bits of
//! per-call randomness into a single 128-bit integer:
//!
//! ```text
//! bit 127                    80 79                              0
//!     ┌───────────────────────┬───────────────────────────────┐
//!     │ milliseconds since    │        random entropy         │
//!     │ Unix epoch (48 bits)  │           (80 bits)           │
//!     └───────────────────────┴───────────────────────────────┘
//! ```
//!
//! Numeric order on the packed value is chronological order, the timestamp
//! is recoverable for display, and the day-bound constructors give exact
//! inclusive endpoints for calendar-date range scans.
//!
//! Dates before the Unix epoch are not representable and saturate to the
//! epoch; the modeled workload starts in 2024.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bits of per-call entropy below the timestamp.
const RANDOM_BITS: u32 = 80;

/// Mask selecting the entropy bits.
const RANDOM_MASK: u128 = (1 << RANDOM_BITS) - 1;

/// Milliseconds in one calendar day.
const DAY_MILLIS: u128 = 86_400_000;

/// A time-ordered, collision-resistant clustering key.
///
/// Two keys compare in chronological order of their embedded timestamps;
/// keys minted for the same instant are distinguished by 80 random bits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TemporalKey(u128);

impl TemporalKey {
    /// Mint a key for a calendar date.
    ///
    /// The timestamp is the date's midnight (UTC); the low bits are fresh
    /// randomness, so two calls with the same date yield distinct keys that
    /// both fall inside `[lower_bound(date), upper_bound(date)]`.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self::at(date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Mint a key for an exact instant.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        let millis = instant.timestamp_millis().max(0) as u128;
        let entropy = rand::random::<u128>() & RANDOM_MASK;
        Self((millis << RANDOM_BITS) | entropy)
    }

    /// Smallest key any encoding of `date` can produce.
    ///
    /// Usable as the inclusive lower endpoint of a day range scan.
    #[must_use]
    pub fn lower_bound(date: NaiveDate) -> Self {
        Self(Self::midnight_millis(date) << RANDOM_BITS)
    }

    /// Largest key any encoding of `date` can produce.
    ///
    /// Usable as the inclusive upper endpoint of a day range scan; keys for
    /// the following day start strictly above it.
    #[must_use]
    pub fn upper_bound(date: NaiveDate) -> Self {
        let last_milli = Self::midnight_millis(date) + (DAY_MILLIS - 1);
        Self((last_milli << RANDOM_BITS) | RANDOM_MASK)
    }

    /// The originating calendar date, for display.
    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.timestamp().date_naive()
    }

    /// The embedded instant.
    #[must_use]
    pub fn timestamp(self) -> DateTime<Utc> {
        // The 48-bit millisecond range ends around year 10889, well inside
        // chrono's representable range.
        DateTime::from_timestamp_millis((self.0 >> RANDOM_BITS) as i64)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// The packed 128-bit representation.
    #[must_use]
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Rebuild a key from its packed representation.
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    fn midnight_millis(date: NaiveDate) -> u128 {
        date.and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis()
            .max(0) as u128
    }
}

impl fmt::Display for TemporalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date().format("%Y-%m-%d"))
    }
}
