//! Row encoding and decoding.
//!
//! The positional layouts here mirror the column lists declared in
//! [`SchemaRegistry::logistics`](logistics_core::schema::SchemaRegistry::logistics);
//! the writer and the router both go through this module so the two sides
//! cannot drift apart independently.

use logistics_core::store::{Row, Value};
use logistics_core::types::{
    Email, OrderEvent, OrderNumber, OrderRecord, ProductLineEvent, ProductRecord, ShipmentEvent,
    ShipmentRecord, TrackingNumber,
};
use std::str::FromStr;

pub(crate) fn encode_order(event: &OrderEvent) -> Row {
    vec![
        Value::Text(event.customer_email.as_str().to_string()),
        Value::Temporal(event.placed_at),
        Value::Text(event.customer_name.clone()),
        Value::Text(event.order_number.as_str().to_string()),
        Value::Money(event.total_amount),
        Value::Text(event.status.as_str().to_string()),
    ]
}

pub(crate) fn encode_product_line(event: &ProductLineEvent) -> Row {
    vec![
        Value::Text(event.order_number.as_str().to_string()),
        Value::Text(event.product_name.clone()),
        Value::Text(event.category.clone()),
        Value::Money(event.unit_price),
        Value::Int(event.quantity),
    ]
}

pub(crate) fn encode_shipment(event: &ShipmentEvent) -> Row {
    vec![
        Value::Text(event.order_number.as_str().to_string()),
        Value::Temporal(event.shipped_at),
        Value::Text(event.tracking_number.as_str().to_string()),
        Value::Text(event.status.as_str().to_string()),
        Value::Text(event.ship_type.as_str().to_string()),
        Value::Money(event.amount),
        Value::Text(event.customer_name.clone()),
    ]
}

pub(crate) fn decode_order(row: Row) -> Result<OrderRecord, String> {
    let mut fields = Fields::new(row);
    let record = OrderRecord {
        customer_email: Email::new(fields.text("email")?),
        placed_at: fields.temporal("order_date")?,
        customer_name: fields.text("name")?,
        order_number: OrderNumber::new(fields.text("order_number")?),
        total_amount: fields.money("total_amount")?,
        status: fields.parsed("status")?,
    };
    fields.finish()?;
    Ok(record)
}

pub(crate) fn decode_product(row: Row) -> Result<ProductRecord, String> {
    let mut fields = Fields::new(row);
    let record = ProductRecord {
        order_number: OrderNumber::new(fields.text("order_number")?),
        product_name: fields.text("product_name")?,
        category: fields.text("category")?,
        unit_price: fields.money("unit_price")?,
        quantity: fields.int("quantity")?,
    };
    fields.finish()?;
    Ok(record)
}

pub(crate) fn decode_shipment(row: Row) -> Result<ShipmentRecord, String> {
    let mut fields = Fields::new(row);
    let record = ShipmentRecord {
        order_number: OrderNumber::new(fields.text("order_number")?),
        shipped_at: fields.temporal("shipment_date")?,
        tracking_number: TrackingNumber::new(fields.text("tracking_number")?),
        status: fields.parsed("status")?,
        ship_type: fields.parsed("ship_type")?,
        amount: fields.money("amount")?,
        customer_name: fields.text("customer_name")?,
    };
    fields.finish()?;
    Ok(record)
}

/// Positional field reader over one row.
struct Fields {
    values: std::vec::IntoIter<Value>,
}

impl Fields {
    fn new(row: Row) -> Self {
        Self {
            values: row.into_iter(),
        }
    }

    fn next(&mut self, name: &str) -> Result<Value, String> {
        self.values
            .next()
            .ok_or_else(|| format!("missing column {name}"))
    }

    fn text(&mut self, name: &str) -> Result<String, String> {
        self.next(name)?
            .into_text()
            .ok_or_else(|| format!("column {name} is not text"))
    }

    fn int(&mut self, name: &str) -> Result<i64, String> {
        self.next(name)?
            .into_int()
            .ok_or_else(|| format!("column {name} is not an integer"))
    }

    fn money(&mut self, name: &str) -> Result<logistics_core::types::Money, String> {
        self.next(name)?
            .into_money()
            .ok_or_else(|| format!("column {name} is not money"))
    }

    fn temporal(&mut self, name: &str) -> Result<logistics_core::temporal::TemporalKey, String> {
        self.next(name)?
            .into_temporal()
            .ok_or_else(|| format!("column {name} is not a temporal id"))
    }

    fn parsed<T>(&mut self, name: &str) -> Result<T, String>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let text = self.text(name)?;
        text.parse()
            .map_err(|e| format!("column {name}: {e}"))
    }

    fn finish(mut self) -> Result<(), String> {
        if self.values.next().is_some() {
            return Err("row has more columns than the declared layout".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::NaiveDate;
    use logistics_core::schema::{SchemaRegistry, View};
    use logistics_core::types::{Money, ShipmentStatus, ShipmentType};

    #[test]
    fn shipment_row_layout_matches_the_registry() {
        let registry = SchemaRegistry::logistics().unwrap();
        let columns = registry.table(View::ShipmentsByOrderDate).columns();

        let event = ShipmentEvent::new(
            OrderNumber::new("ORD-AB12CD34"),
            TrackingNumber::new("TRK-0011223344"),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            ShipmentStatus::InTransit,
            ShipmentType::Express,
            Money::from_cents(12_345),
            "Ana Martínez",
        );
        let row = encode_shipment(&event);
        assert_eq!(row.len(), columns.len());
    }

    #[test]
    fn shipment_encode_decode_roundtrips() {
        let event = ShipmentEvent::new(
            OrderNumber::new("ORD-AB12CD34"),
            TrackingNumber::new("TRK-0011223344"),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            ShipmentStatus::OutForDelivery,
            ShipmentType::SameDay,
            Money::from_cents(9_999),
            "Luis López",
        );

        let record = decode_shipment(encode_shipment(&event)).unwrap();
        assert_eq!(record.order_number, event.order_number);
        assert_eq!(record.shipped_at, event.shipped_at);
        assert_eq!(record.status, event.status);
        assert_eq!(record.ship_type, event.ship_type);
        assert_eq!(record.amount, event.amount);
        assert_eq!(record.customer_name, event.customer_name);
    }

    #[test]
    fn corrupt_enum_text_is_reported() {
        let mut row = vec![
            Value::Text("ORD-AB12CD34".to_string()),
            Value::Temporal(logistics_core::temporal::TemporalKey::for_date(
                NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            )),
            Value::Text("TRK-0011223344".to_string()),
            Value::Text("Lost".to_string()),
            Value::Text("Express".to_string()),
            Value::Money(Money::from_cents(1)),
            Value::Text("x".to_string()),
        ];
        assert!(decode_shipment(row.clone()).unwrap_err().contains("status"));

        row.truncate(3);
        assert!(decode_shipment(row).unwrap_err().contains("missing"));
    }
}
