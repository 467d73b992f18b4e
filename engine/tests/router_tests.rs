//! Integration tests for the query router against the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code unwraps for clear failures.

use chrono::NaiveDate;
use futures::TryStreamExt;
use logistics_core::schema::{SchemaRegistry, View};
use logistics_core::store::StoreSession;
use logistics_core::types::{
    Customer, DateRange, Email, Money, OrderEvent, OrderNumber, OrderStatus, ProductLineEvent,
    ShipmentEvent, ShipmentRecord, ShipmentStatus, ShipmentType, TrackingNumber,
};
use logistics_engine::{FanOutWriter, QueryRouter, ShipmentFilters};
use logistics_testing::MemoryStore;
use std::sync::Arc;

async fn setup() -> (MemoryStore, FanOutWriter, QueryRouter) {
    let store = MemoryStore::new();
    let registry = Arc::new(SchemaRegistry::logistics().unwrap());
    for table in registry.tables() {
        store.create_table(table).await.unwrap();
    }
    let session: Arc<dyn StoreSession> = Arc::new(store.clone());
    let writer = FanOutWriter::new(registry.clone(), session.clone());
    let router = QueryRouter::new(registry, session);
    (store, writer, router)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn shipment(
    order: &str,
    tracking: &str,
    day: NaiveDate,
    status: ShipmentStatus,
    ship_type: ShipmentType,
) -> ShipmentEvent {
    ShipmentEvent::new(
        OrderNumber::new(order),
        TrackingNumber::new(tracking),
        day,
        status,
        ship_type,
        Money::from_cents(1_500),
        "María González",
    )
}

/// Ten shipments for one order: four Express, mixed statuses, dates spread
/// across 2024–2025.
async fn seed_order_abc(writer: &FanOutWriter) -> OrderNumber {
    let order = OrderNumber::new("ORD-ABC12345");
    let mix = [
        (date(2024, 1, 5), ShipmentStatus::Delivered, ShipmentType::Express),
        (date(2024, 1, 20), ShipmentStatus::InTransit, ShipmentType::Standard),
        (date(2024, 3, 2), ShipmentStatus::Pending, ShipmentType::Express),
        (date(2024, 6, 18), ShipmentStatus::Delayed, ShipmentType::Standard),
        (date(2024, 9, 9), ShipmentStatus::Delivered, ShipmentType::Express),
        (date(2024, 12, 24), ShipmentStatus::Returned, ShipmentType::Standard),
        (date(2025, 2, 14), ShipmentStatus::Shipped, ShipmentType::Standard),
        (date(2025, 5, 30), ShipmentStatus::Delivered, ShipmentType::Express),
        (date(2025, 8, 1), ShipmentStatus::OutForDelivery, ShipmentType::Standard),
        (date(2025, 11, 11), ShipmentStatus::Pending, ShipmentType::Standard),
    ];
    let events: Vec<ShipmentEvent> = mix
        .iter()
        .enumerate()
        .map(|(i, (day, status, ship_type))| {
            shipment(
                order.as_str(),
                &format!("TRK-{i:010X}"),
                *day,
                *status,
                *ship_type,
            )
        })
        .collect();
    writer.record_shipments(&events).await.unwrap();
    order
}

async fn collect(
    router: &QueryRouter,
    order: &OrderNumber,
    filters: &ShipmentFilters,
) -> Vec<ShipmentRecord> {
    router
        .find_shipments(order, filters)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap()
}

#[tokio::test]
async fn every_filter_combination_routes_to_its_declared_projection() {
    let (store, writer, router) = setup().await;
    let order = seed_order_abc(&writer).await;

    let range = DateRange::new(date(2024, 1, 1), date(2025, 12, 31)).unwrap();
    let cases = [
        (ShipmentFilters::none(), View::ShipmentsByOrderDate),
        (
            ShipmentFilters::none().with_date_range(range),
            View::ShipmentsByOrderDate,
        ),
        (
            ShipmentFilters::none().with_status(ShipmentStatus::Delivered),
            View::ShipmentsByOrderStatusDate,
        ),
        (
            ShipmentFilters::none().with_type(ShipmentType::Express),
            View::ShipmentsByOrderTypeDate,
        ),
        (
            ShipmentFilters::none()
                .with_type(ShipmentType::Express)
                .with_status(ShipmentStatus::Delivered),
            View::ShipmentsByOrderTypeStatusDate,
        ),
        (
            ShipmentFilters::none()
                .with_type(ShipmentType::Express)
                .with_status(ShipmentStatus::Delivered)
                .with_date_range(range),
            View::ShipmentsByOrderTypeStatusDate,
        ),
    ];

    for (filters, expected) in cases {
        store.clear_scan_log();
        let _records = collect(&router, &order, &filters).await;
        assert_eq!(
            store.scanned_tables(),
            vec![expected.table_name().to_string()],
            "filters {filters:?} routed to the wrong projection"
        );
    }
}

#[tokio::test]
async fn express_filter_returns_only_express_newest_first() {
    let (_store, writer, router) = setup().await;
    let order = seed_order_abc(&writer).await;

    let records = collect(
        &router,
        &order,
        &ShipmentFilters::none().with_type(ShipmentType::Express),
    )
    .await;

    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.ship_type == ShipmentType::Express));
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.shipped_at.date()).collect();
    assert_eq!(
        dates,
        vec![
            date(2025, 5, 30),
            date(2024, 9, 9),
            date(2024, 3, 2),
            date(2024, 1, 5),
        ]
    );

    // A type with zero matching shipments is an empty sequence, not an
    // error.
    let none = collect(
        &router,
        &order,
        &ShipmentFilters::none().with_type(ShipmentType::SameDay),
    )
    .await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn date_range_keeps_only_shipments_inside_the_calendar_window() {
    let (_store, writer, router) = setup().await;
    let order = seed_order_abc(&writer).await;

    let january = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
    let records = collect(
        &router,
        &order,
        &ShipmentFilters::none().with_date_range(january),
    )
    .await;

    let dates: Vec<NaiveDate> = records.iter().map(|r| r.shipped_at.date()).collect();
    assert_eq!(dates, vec![date(2024, 1, 20), date(2024, 1, 5)]);
}

#[tokio::test]
async fn all_four_projections_agree_on_the_payload() {
    let (_store, writer, router) = setup().await;
    let order = OrderNumber::new("ORD-FAN00001");
    let event = shipment(
        order.as_str(),
        "TRK-00AGREE000",
        date(2024, 4, 1),
        ShipmentStatus::InTransit,
        ShipmentType::Express,
    );
    writer.record_shipment(&event).await.unwrap();

    // One filter combination per projection, each matching the shipment.
    let filter_sets = [
        ShipmentFilters::none(),
        ShipmentFilters::none().with_status(ShipmentStatus::InTransit),
        ShipmentFilters::none().with_type(ShipmentType::Express),
        ShipmentFilters::none()
            .with_type(ShipmentType::Express)
            .with_status(ShipmentStatus::InTransit),
    ];

    let mut views_seen = Vec::new();
    for filters in filter_sets {
        let records = collect(&router, &order, &filters).await;
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.order_number, order);
        assert_eq!(record.shipped_at, event.shipped_at);
        assert_eq!(record.tracking_number, event.tracking_number);
        assert_eq!(record.status, event.status);
        assert_eq!(record.ship_type, event.ship_type);
        assert_eq!(record.amount, event.amount);
        assert_eq!(record.customer_name, event.customer_name);
        views_seen.push(filters.view());
    }
    assert_eq!(views_seen, View::SHIPMENTS.to_vec());
}

#[tokio::test]
async fn rereading_with_identical_arguments_yields_identical_sequences() {
    let (_store, writer, router) = setup().await;
    let order = seed_order_abc(&writer).await;
    let filters = ShipmentFilters::none().with_status(ShipmentStatus::Delivered);

    let first = collect(&router, &order, &filters).await;
    let second = collect(&router, &order, &filters).await;
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn unknown_order_yields_an_empty_stream() {
    let (_store, writer, router) = setup().await;
    seed_order_abc(&writer).await;

    let records = collect(
        &router,
        &OrderNumber::new("ORD-MISSING1"),
        &ShipmentFilters::none(),
    )
    .await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn unrecognized_filter_text_fails_before_any_store_call() {
    let (store, writer, _router) = setup().await;
    seed_order_abc(&writer).await;
    store.clear_scan_log();

    let err = ShipmentFilters::parse(None, Some("Lost"), (None, None)).unwrap_err();
    assert_eq!(
        err,
        logistics_core::ValidationError::UnknownShipmentStatus("Lost".to_string())
    );
    assert!(store.scanned_tables().is_empty());

    // A half-specified date range is no range filter, not an error.
    let filters =
        ShipmentFilters::parse(Some("Express"), None, (Some(date(2024, 1, 1)), None)).unwrap();
    assert_eq!(filters.date_range, None);
    assert_eq!(filters.ship_type, Some(ShipmentType::Express));
}

#[tokio::test]
async fn orders_and_products_route_to_their_single_views() {
    let (store, writer, router) = setup().await;

    let customer = Customer {
        email: Email::new("carlos.rodriguez@email.com"),
        name: "Carlos Rodríguez".to_string(),
        phone: "+52-33-3456-7890".to_string(),
        address: "Av. Américas 890, Guadalajara, Jalisco".to_string(),
    };
    for (token, day) in [("ORD-00000001", 10), ("ORD-00000002", 20)] {
        writer
            .record_order(&OrderEvent::new(
                &customer,
                OrderNumber::new(token),
                date(2024, 5, day),
                Money::from_cents(40_000_00),
                OrderStatus::Shipped,
            ))
            .await
            .unwrap();
    }
    for name in ["Mochila North Face", "Cafetera Nespresso", "Aspiradora Dyson V11"] {
        writer
            .record_product_line(&ProductLineEvent {
                order_number: OrderNumber::new("ORD-00000001"),
                product_name: name.to_string(),
                category: "Hogar".to_string(),
                unit_price: Money::from_cents(3_200_00),
                quantity: 1,
            })
            .await
            .unwrap();
    }
    store.clear_scan_log();

    let orders: Vec<_> = router
        .find_orders_by_customer(&customer.email)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(orders.len(), 2);
    // Newest order first under the customer partition.
    assert_eq!(orders[0].order_number, OrderNumber::new("ORD-00000002"));
    assert_eq!(orders[1].order_number, OrderNumber::new("ORD-00000001"));

    let products: Vec<_> = router
        .find_products_by_order(&OrderNumber::new("ORD-00000001"))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    let names: Vec<&str> = products.iter().map(|p| p.product_name.as_str()).collect();
    // Product name ascending, the declared clustering order.
    assert_eq!(
        names,
        vec!["Aspiradora Dyson V11", "Cafetera Nespresso", "Mochila North Face"]
    );

    assert_eq!(
        store.scanned_tables(),
        vec![
            View::OrdersByCustomer.table_name().to_string(),
            View::ProductsByOrder.table_name().to_string(),
        ]
    );
}
