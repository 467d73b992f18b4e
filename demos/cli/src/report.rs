//! Stream-consuming console renderers.
//!
//! Each renderer drains a record stream page by page, so large partitions
//! print incrementally instead of being collected first.

use futures::TryStreamExt;
use logistics_core::types::{Email, OrderNumber};
use logistics_engine::{OrderStream, ProductStream, ShipmentFilters, ShipmentStream};

/// Print a customer's orders, newest first.
///
/// # Errors
///
/// Returns an error if the stream fails partway; rows already printed
/// stay printed.
pub async fn print_orders(email: &Email, mut orders: OrderStream) -> anyhow::Result<()> {
    println!("\n=== Orders for customer: {email} ===");
    let mut count = 0usize;
    while let Some(order) = orders.try_next().await? {
        println!("Order: {}", order.order_number);
        println!("  - Date: {}", order.placed_at);
        println!("  - Customer: {}", order.customer_name);
        println!("  - Total: {}", order.total_amount);
        println!("  - Status: {}", order.status);
        println!();
        count += 1;
    }
    print_count(count, "order");
    Ok(())
}

/// Print an order's product lines, by product name.
///
/// # Errors
///
/// Returns an error if the stream fails partway.
pub async fn print_products(
    order_number: &OrderNumber,
    mut products: ProductStream,
) -> anyhow::Result<()> {
    println!("\n=== Products for order: {order_number} ===");
    let mut count = 0usize;
    while let Some(product) = products.try_next().await? {
        println!("Product: {}", product.product_name);
        println!("  - Category: {}", product.category);
        println!("  - Unit price: {}", product.unit_price);
        println!("  - Quantity: {}", product.quantity);
        println!();
        count += 1;
    }
    print_count(count, "product");
    Ok(())
}

/// Print an order's shipments under the given filters, newest first
/// within the selected view's clustering order.
///
/// # Errors
///
/// Returns an error if the stream fails partway.
pub async fn print_shipments(
    order_number: &OrderNumber,
    filters: &ShipmentFilters,
    mut shipments: ShipmentStream,
) -> anyhow::Result<()> {
    let mut heading = format!("\n=== Shipments for order: {order_number}");
    if let Some(ship_type) = filters.ship_type {
        heading.push_str(&format!(", type: {ship_type}"));
    }
    if let Some(status) = filters.status {
        heading.push_str(&format!(", status: {status}"));
    }
    if let Some(range) = filters.date_range {
        heading.push_str(&format!(", from {} to {}", range.start(), range.end()));
    }
    heading.push_str(" ===");
    println!("{heading}");

    let mut count = 0usize;
    while let Some(shipment) = shipments.try_next().await? {
        println!("Shipment: {}", shipment.tracking_number);
        println!("  - Date: {}", shipment.shipped_at);
        println!("  - Status: {}", shipment.status);
        println!("  - Type: {}", shipment.ship_type);
        println!("  - Amount: {}", shipment.amount);
        println!("  - Customer: {}", shipment.customer_name);
        println!();
        count += 1;
    }
    print_count(count, "shipment");
    Ok(())
}

fn print_count(count: usize, noun: &str) {
    if count == 0 {
        println!("(no {noun}s found)");
    } else {
        println!("{count} {noun}(s)");
    }
}
