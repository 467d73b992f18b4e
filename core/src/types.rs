//! Domain types for the logistics read models.
//!
//! Everything the write path (events) and the read path (records) exchange
//! with the store is built from the types here. Enumerations carry their
//! wire text (`"In Transit"`, `"Same-day"`, ...) through `Display`/`FromStr`
//! so that validation happens in this crate, never in the backing store.

use crate::temporal::TemporalKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

/// Error for caller-supplied values that fail validation.
///
/// Raised before any store operation is attempted; the core performs no
/// silent coercion of unrecognized input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Order status text not in the fixed enumeration.
    #[error("unrecognized order status {0:?}")]
    UnknownOrderStatus(String),

    /// Shipment status text not in the fixed enumeration.
    #[error("unrecognized shipment status {0:?}")]
    UnknownShipmentStatus(String),

    /// Shipment type text not in the fixed enumeration.
    #[error("unrecognized shipment type {0:?}")]
    UnknownShipmentType(String),

    /// Date text that does not parse as `YYYY-MM-DD`.
    #[error("malformed date {0:?} (expected YYYY-MM-DD)")]
    MalformedDate(String),

    /// Date range whose start falls after its end.
    #[error("date range starts {start} after it ends {end}")]
    InvertedDateRange {
        /// Requested range start.
        start: NaiveDate,
        /// Requested range end.
        end: NaiveDate,
    },
}

/// Parse a calendar date from its `YYYY-MM-DD` wire text.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedDate`] if the text does not parse.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ValidationError::MalformedDate(text.to_string()))
}

/// An inclusive calendar date range.
///
/// Both endpoints are required; callers with only one endpoint should treat
/// the range as absent (the temporal key codec has no open-ended bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range from inclusive endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvertedDateRange`] if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive start of the range.
    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.start
    }

    /// Inclusive end of the range.
    #[must_use]
    pub const fn end(self) -> NaiveDate {
        self.end
    }
}

/// Monetary amount in integer cents.
///
/// Stored as fixed-point to keep row payloads exact; rendered as
/// `$1,234.56`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create an amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in integer cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Divide the amount evenly across `parts`, dropping any remainder cents.
    ///
    /// `parts == 0` returns the amount unchanged rather than dividing by zero.
    #[must_use]
    pub const fn split(self, parts: u32) -> Self {
        if parts == 0 {
            self
        } else {
            Self(self.0 / parts as i64)
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = (abs / 100).to_string();
        let cents = abs % 100;

        // Group the dollar digits in threes from the right.
        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, ch) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}${grouped}.{cents:02}")
    }
}

macro_rules! text_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Wrap the raw text value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// The raw text value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_newtype!(
    /// Customer email, the unique customer identifier.
    Email
);
text_newtype!(
    /// Order number (`ORD-` followed by eight hex digits).
    OrderNumber
);
text_newtype!(
    /// Shipment tracking number, unique within an order by construction.
    TrackingNumber
);

/// Immutable customer reference data.
///
/// Created at data-load time and never mutated; only `email` and `name`
/// ever reach a projection row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier.
    pub email: Email,
    /// Display name, denormalized onto order and shipment rows.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

macro_rules! wire_enum {
    (
        $(#[$doc:meta])* $name:ident, $err:ident;
        $($variant:ident => $text:literal),+ $(,)?
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $text]
                $variant,
            )+
        }

        impl $name {
            /// Every member of the enumeration, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire text as persisted in projection rows.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ValidationError::$err(other.to_string())),
                }
            }
        }
    };
}

wire_enum!(
    /// Lifecycle status of an order.
    OrderStatus, UnknownOrderStatus;
    Pending => "Pending",
    Processing => "Processing",
    Shipped => "Shipped",
    Delivered => "Delivered",
    Cancelled => "Cancelled",
);

wire_enum!(
    /// Lifecycle status of a shipment.
    ShipmentStatus, UnknownShipmentStatus;
    Pending => "Pending",
    Shipped => "Shipped",
    InTransit => "In Transit",
    OutForDelivery => "Out for Delivery",
    Delivered => "Delivered",
    Delayed => "Delayed",
    Returned => "Returned",
);

wire_enum!(
    /// Delivery class of a shipment.
    ShipmentType, UnknownShipmentType;
    Standard => "Standard",
    Express => "Express",
    SameDay => "Same-day",
);

/// Write-path event for a newly placed order.
///
/// The temporal key is minted when the event is constructed, so retrying a
/// failed write re-submits the same clustering key instead of minting a
/// divergent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Owning customer.
    pub customer_email: Email,
    /// Customer display name, denormalized for read-path locality.
    pub customer_name: String,
    /// Store-generated order token.
    pub order_number: OrderNumber,
    /// Time-ordered clustering key under the customer partition.
    pub placed_at: TemporalKey,
    /// Sum of the order's product lines, fixed at creation.
    pub total_amount: Money,
    /// Order status at creation.
    pub status: OrderStatus,
}

impl OrderEvent {
    /// Build an order event for `customer`, minting its temporal key from
    /// the order date.
    #[must_use]
    pub fn new(
        customer: &Customer,
        order_number: OrderNumber,
        order_date: NaiveDate,
        total_amount: Money,
        status: OrderStatus,
    ) -> Self {
        Self {
            customer_email: customer.email.clone(),
            customer_name: customer.name.clone(),
            order_number,
            placed_at: TemporalKey::for_date(order_date),
            total_amount,
            status,
        }
    }
}

/// Write-path event for one product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLineEvent {
    /// Owning order.
    pub order_number: OrderNumber,
    /// Product name; clustering key, unique per order.
    pub product_name: String,
    /// Product category.
    pub category: String,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity ordered.
    pub quantity: i64,
}

/// Write-path event for one shipment of an order.
///
/// Fanned out to every shipment view with an identical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentEvent {
    /// Owning order.
    pub order_number: OrderNumber,
    /// Time-ordered clustering key, minted at construction.
    pub shipped_at: TemporalKey,
    /// Tracking number, unique within the order.
    pub tracking_number: TrackingNumber,
    /// Shipment status.
    pub status: ShipmentStatus,
    /// Delivery class.
    pub ship_type: ShipmentType,
    /// Fraction of the order total carried by this shipment.
    pub amount: Money,
    /// Customer display name, denormalized from the order.
    pub customer_name: String,
}

impl ShipmentEvent {
    /// Build a shipment event, minting its temporal key from the shipment
    /// date.
    #[must_use]
    pub fn new(
        order_number: OrderNumber,
        tracking_number: TrackingNumber,
        shipment_date: NaiveDate,
        status: ShipmentStatus,
        ship_type: ShipmentType,
        amount: Money,
        customer_name: impl Into<String>,
    ) -> Self {
        Self {
            order_number,
            shipped_at: TemporalKey::for_date(shipment_date),
            tracking_number,
            status,
            ship_type,
            amount,
            customer_name: customer_name.into(),
        }
    }
}

/// Read-path record decoded from the orders-by-customer view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Owning customer.
    pub customer_email: Email,
    /// Order clustering key; renders as the order date.
    pub placed_at: TemporalKey,
    /// Customer display name.
    pub customer_name: String,
    /// Order token.
    pub order_number: OrderNumber,
    /// Order total.
    pub total_amount: Money,
    /// Order status.
    pub status: OrderStatus,
}

/// Read-path record decoded from the products-by-order view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Owning order.
    pub order_number: OrderNumber,
    /// Product name.
    pub product_name: String,
    /// Product category.
    pub category: String,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity ordered.
    pub quantity: i64,
}

/// Read-path record decoded from any of the four shipment views.
///
/// The payload is identical regardless of which view served the query;
/// only the clustering scheme differs between views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Owning order.
    pub order_number: OrderNumber,
    /// Shipment clustering key; renders as the shipment date.
    pub shipped_at: TemporalKey,
    /// Tracking number.
    pub tracking_number: TrackingNumber,
    /// Shipment status.
    pub status: ShipmentStatus,
    /// Delivery class.
    pub ship_type: ShipmentType,
    /// Amount carried by this shipment.
    pub amount: Money,
    /// Customer display name.
    pub customer_name: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn shipment_status_wire_text_roundtrips() {
        for status in ShipmentStatus::ALL {
            let parsed: ShipmentStatus = status
                .as_str()
                .parse()
                .unwrap_or_else(|e| panic!("{status} failed to reparse: {e}"));
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn shipment_type_wire_text_roundtrips() {
        for ship_type in ShipmentType::ALL {
            assert_eq!(ship_type.as_str().parse::<ShipmentType>(), Ok(*ship_type));
        }
        assert_eq!("Same-day".parse::<ShipmentType>(), Ok(ShipmentType::SameDay));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(
            "Lost".parse::<ShipmentStatus>(),
            Err(ValidationError::UnknownShipmentStatus("Lost".to_string()))
        );
        assert_eq!(
            "Teleported".parse::<ShipmentType>(),
            Err(ValidationError::UnknownShipmentType("Teleported".to_string()))
        );
    }

    #[test]
    fn money_renders_with_grouping() {
        assert_eq!(Money::from_cents(2_500_000).to_string(), "$25,000.00");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "$1,234,567.89");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-150).to_string(), "-$1.50");
    }

    #[test]
    fn money_splits_evenly_across_shipments() {
        let total = Money::from_cents(10_000);
        assert_eq!(total.split(10), Money::from_cents(1_000));
        assert_eq!(total.split(0), total);
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            DateRange::new(start, end),
            Err(ValidationError::InvertedDateRange { start, end })
        );
        assert!(DateRange::new(end, start).is_ok());
        assert!(DateRange::new(start, start).is_ok());
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(parse_date("2024-01-15").is_ok());
        assert_eq!(
            parse_date("01/15/2024"),
            Err(ValidationError::MalformedDate("01/15/2024".to_string()))
        );
    }
}
