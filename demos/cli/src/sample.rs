//! Sample-data fixtures and bulk loader.
//!
//! Fixed customer and product catalogs plus a randomized order generator:
//! 100 orders, each with three distinct product lines and ten shipments,
//! dated across 2024–2025. Order and tracking tokens embed a sequence
//! prefix so the generated set never collides with itself.

use anyhow::Context;
use chrono::{Days, NaiveDate};
use logistics_core::types::{
    Customer, Email, Money, OrderEvent, OrderNumber, OrderStatus, ProductLineEvent, ShipmentEvent,
    ShipmentStatus, ShipmentType, TrackingNumber,
};
use logistics_engine::FanOutWriter;
use rand::seq::SliceRandom;
use rand::Rng;

const ORDER_COUNT: usize = 100;
const PRODUCTS_PER_ORDER: usize = 3;
const SHIPMENTS_PER_ORDER: usize = 10;

const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    (
        "juan.perez@email.com",
        "Juan Pérez",
        "+52-33-1234-5678",
        "Av. Patria 1234, Zapopan, Jalisco",
    ),
    (
        "maria.gonzalez@email.com",
        "María González",
        "+52-33-2345-6789",
        "Calle Independencia 567, Guadalajara, Jalisco",
    ),
    (
        "carlos.rodriguez@email.com",
        "Carlos Rodríguez",
        "+52-33-3456-7890",
        "Av. Américas 890, Guadalajara, Jalisco",
    ),
    (
        "ana.martinez@email.com",
        "Ana Martínez",
        "+52-33-4567-8901",
        "Calle Libertad 123, Tlaquepaque, Jalisco",
    ),
    (
        "luis.lopez@email.com",
        "Luis López",
        "+52-33-5678-9012",
        "Av. López Mateos 456, Zapopan, Jalisco",
    ),
    (
        "sofia.hernandez@email.com",
        "Sofía Hernández",
        "+52-33-6789-0123",
        "Calle Reforma 789, Guadalajara, Jalisco",
    ),
];

/// Product catalog: name, category, unit price in cents.
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("Laptop Dell XPS 13", "Electrónicos", 2_500_000),
    ("iPhone 14 Pro", "Electrónicos", 2_800_000),
    ("Samsung Galaxy S23", "Electrónicos", 2_200_000),
    ("Nike Air Max 270", "Calzado", 350_000),
    ("Adidas Ultraboost 22", "Calzado", 420_000),
    ("Levi's 501 Jeans", "Ropa", 180_000),
    ("Camisa Hugo Boss", "Ropa", 250_000),
    ("Mochila North Face", "Accesorios", 120_000),
    ("Reloj Apple Watch Series 8", "Electrónicos", 850_000),
    ("Audífonos Sony WH-1000XM4", "Electrónicos", 650_000),
    ("Cafetera Nespresso", "Hogar", 320_000),
    ("Aspiradora Dyson V11", "Hogar", 1_200_000),
    ("Licuadora Vitamix", "Hogar", 800_000),
    ("Perfume Chanel No. 5", "Belleza", 450_000),
    ("Crema La Mer", "Belleza", 600_000),
];

/// The fixed customer catalog.
#[must_use]
pub fn customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|(email, name, phone, address)| Customer {
            email: Email::new(*email),
            name: (*name).to_string(),
            phone: (*phone).to_string(),
            address: (*address).to_string(),
        })
        .collect()
}

/// What a bulk load produced, for operator feedback.
#[derive(Debug)]
pub struct SampleSummary {
    /// Orders written.
    pub orders: usize,
    /// Product lines written.
    pub product_lines: usize,
    /// Shipments fanned out.
    pub shipments: usize,
    /// A few order numbers to try queries against.
    pub example_orders: Vec<OrderNumber>,
}

/// Generate and write the full sample data set.
///
/// # Errors
///
/// Returns an error if any write fails; the shipment fan-out error names
/// the views that were not reached.
pub async fn populate(writer: &FanOutWriter) -> anyhow::Result<SampleSummary> {
    let window_start = NaiveDate::from_ymd_opt(2024, 1, 1).context("sample window start")?;
    let window_end = NaiveDate::from_ymd_opt(2025, 12, 31).context("sample window end")?;
    let window_days = u64::try_from((window_end - window_start).num_days())
        .context("sample window is inverted")?;

    let mut rng = rand::thread_rng();
    let customers = customers();

    let mut orders = Vec::with_capacity(ORDER_COUNT);
    let mut product_lines = Vec::with_capacity(ORDER_COUNT * PRODUCTS_PER_ORDER);
    let mut shipments = Vec::with_capacity(ORDER_COUNT * SHIPMENTS_PER_ORDER);

    for order_index in 0..ORDER_COUNT {
        let customer = &customers[rng.gen_range(0..customers.len())];
        let order_number = OrderNumber::new(format!(
            "ORD-{order_index:02X}{:06X}",
            rng.gen_range(0..0x0100_0000u32)
        ));
        let order_date = window_start + Days::new(rng.gen_range(0..window_days));

        let mut total_amount = Money::ZERO;
        for (product_name, category, price_cents) in
            PRODUCTS.choose_multiple(&mut rng, PRODUCTS_PER_ORDER)
        {
            let quantity = rng.gen_range(1..=3i64);
            let unit_price = Money::from_cents(*price_cents);
            total_amount += unit_price * quantity;
            product_lines.push(ProductLineEvent {
                order_number: order_number.clone(),
                product_name: (*product_name).to_string(),
                category: (*category).to_string(),
                unit_price,
                quantity,
            });
        }

        let status = OrderStatus::ALL[rng.gen_range(0..OrderStatus::ALL.len())];
        orders.push(OrderEvent::new(
            customer,
            order_number.clone(),
            order_date,
            total_amount,
            status,
        ));

        let shipment_amount = total_amount.split(SHIPMENTS_PER_ORDER as u32);
        for shipment_index in 0..SHIPMENTS_PER_ORDER {
            let tracking_number = TrackingNumber::new(format!(
                "TRK-{order_index:02X}{shipment_index:02X}{:06X}",
                rng.gen_range(0..0x0100_0000u32)
            ));
            shipments.push(ShipmentEvent::new(
                order_number.clone(),
                tracking_number,
                window_start + Days::new(rng.gen_range(0..window_days)),
                ShipmentStatus::ALL[rng.gen_range(0..ShipmentStatus::ALL.len())],
                ShipmentType::ALL[rng.gen_range(0..ShipmentType::ALL.len())],
                shipment_amount,
                customer.name.clone(),
            ));
        }
    }

    writer.record_orders(&orders).await?;
    writer.record_product_lines(&product_lines).await?;
    writer.record_shipments(&shipments).await?;

    let example_orders = orders
        .iter()
        .take(5)
        .map(|order| order.order_number.clone())
        .collect();
    Ok(SampleSummary {
        orders: orders.len(),
        product_lines: product_lines.len(),
        shipments: shipments.len(),
        example_orders,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use logistics_core::schema::{SchemaRegistry, View};
    use logistics_core::store::StoreSession;
    use logistics_testing::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn populate_fills_every_view() {
        let store = MemoryStore::new();
        let registry = Arc::new(SchemaRegistry::logistics().unwrap());
        for table in registry.tables() {
            store.create_table(table).await.unwrap();
        }
        let writer = FanOutWriter::new(registry, Arc::new(store.clone()));

        let summary = populate(&writer).await.unwrap();
        assert_eq!(summary.orders, 100);
        assert_eq!(summary.product_lines, 300);
        assert_eq!(summary.shipments, 1_000);
        assert_eq!(summary.example_orders.len(), 5);

        // Tokens are sequence-prefixed, so every generated row survives
        // the store's upsert semantics.
        assert_eq!(store.row_count(View::OrdersByCustomer.table_name()), 100);
        assert_eq!(store.row_count(View::ProductsByOrder.table_name()), 300);
        for view in View::SHIPMENTS {
            assert_eq!(store.row_count(view.table_name()), 1_000);
        }
    }

    #[test]
    fn catalogs_match_the_generator_shape() {
        assert_eq!(customers().len(), 6);
        assert!(PRODUCTS.len() >= PRODUCTS_PER_ORDER);
    }
}
