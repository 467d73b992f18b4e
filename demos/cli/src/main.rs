//! Interactive demo for the logistics read models.
//!
//! A menu-driven loop over the write fan-out engine and the query router,
//! backed by the in-memory store: populate sample data, then exercise each
//! access pattern against the projection that serves it.

mod config;
mod report;
mod sample;

use crate::config::Config;
use chrono::NaiveDate;
use logistics_core::schema::SchemaRegistry;
use logistics_core::store::StoreSession;
use logistics_core::types::{
    parse_date, Email, OrderNumber, ShipmentStatus, ShipmentType,
};
use logistics_engine::{FanOutWriter, QueryRouter, ShipmentFilters};
use logistics_testing::MemoryStore;
use std::io::{self, Write as _};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        contact_points = ?config.contact_points,
        keyspace = %config.keyspace,
        "connecting to store"
    );

    let store = MemoryStore::new();
    let session: Arc<dyn StoreSession> = Arc::new(store);
    session
        .create_keyspace(&config.keyspace, config.replication_factor)
        .await?;

    let registry = Arc::new(SchemaRegistry::logistics()?);
    for table in registry.tables() {
        session.create_table(table).await?;
    }
    info!("schema created");

    let writer = FanOutWriter::new(registry.clone(), session.clone());
    let router = QueryRouter::new(registry, session);

    let mut email = prompt_customer_email()?;
    loop {
        println!("\n{}", "=".repeat(50));
        print_menu();
        let Some(option) = prompt("\nEnter your choice: ")?.parse::<u32>().ok() else {
            println!("Please enter a valid number.");
            continue;
        };
        if option == 9 {
            break;
        }
        if let Err(error) = run_option(option, &writer, &router, &mut email).await {
            println!("Error: {error:#}");
        }
    }
    Ok(())
}

fn print_menu() {
    let options = [
        "Populate sample data",
        "Show orders by customer (Q1)",
        "Show products by order (Q2)",
        "Show all shipments by order (Q3.1)",
        "Show shipments by order with date range (Q3.2)",
        "Show shipments by order and status with date range (Q3.3)",
        "Show shipments by order and type with date range (Q3.4)",
        "Show shipments by order, type and status with date range (Q3.5)",
        "Change working email",
        "Exit",
    ];
    for (key, label) in options.iter().enumerate() {
        println!("{key} -- {label}");
    }
}

async fn run_option(
    option: u32,
    writer: &FanOutWriter,
    router: &QueryRouter,
    email: &mut Email,
) -> anyhow::Result<()> {
    match option {
        0 => {
            println!("Populating sample data...");
            let summary = sample::populate(writer).await?;
            println!(
                "Wrote {} orders, {} product lines, {} shipments.",
                summary.orders, summary.product_lines, summary.shipments
            );
            println!("Example order numbers:");
            for order in &summary.example_orders {
                println!("  - {order}");
            }
        }
        1 => {
            let orders = router.find_orders_by_customer(email).await?;
            report::print_orders(email, orders).await?;
        }
        2 => {
            let order = prompt_order_number()?;
            let products = router.find_products_by_order(&order).await?;
            report::print_products(&order, products).await?;
        }
        3 => {
            let order = prompt_order_number()?;
            let filters = ShipmentFilters::none();
            let shipments = router.find_shipments(&order, &filters).await?;
            report::print_shipments(&order, &filters, shipments).await?;
        }
        4 => {
            let order = prompt_order_number()?;
            let filters = ShipmentFilters::parse(None, None, prompt_date_range()?)?;
            let shipments = router.find_shipments(&order, &filters).await?;
            report::print_shipments(&order, &filters, shipments).await?;
        }
        5 => {
            let order = prompt_order_number()?;
            let status = prompt_shipment_status()?;
            let filters = ShipmentFilters::parse(None, Some(&status), prompt_date_range()?)?;
            let shipments = router.find_shipments(&order, &filters).await?;
            report::print_shipments(&order, &filters, shipments).await?;
        }
        6 => {
            let order = prompt_order_number()?;
            let ship_type = prompt_shipment_type()?;
            let filters = ShipmentFilters::parse(Some(&ship_type), None, prompt_date_range()?)?;
            let shipments = router.find_shipments(&order, &filters).await?;
            report::print_shipments(&order, &filters, shipments).await?;
        }
        7 => {
            let order = prompt_order_number()?;
            let ship_type = prompt_shipment_type()?;
            let status = prompt_shipment_status()?;
            let filters =
                ShipmentFilters::parse(Some(&ship_type), Some(&status), prompt_date_range()?)?;
            let shipments = router.find_shipments(&order, &filters).await?;
            report::print_shipments(&order, &filters, shipments).await?;
        }
        8 => {
            *email = prompt_customer_email()?;
        }
        _ => println!("Please enter a number between 0 and 9."),
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_customer_email() -> anyhow::Result<Email> {
    println!("\nSample customer emails:");
    for customer in sample::customers() {
        println!("  - {} ({})", customer.email, customer.name);
    }
    let email = Email::new(prompt("\n**** Customer email to use: ")?);
    info!(customer = %email, "working email set");
    Ok(email)
}

fn prompt_order_number() -> anyhow::Result<OrderNumber> {
    Ok(OrderNumber::new(prompt("Enter order number: ")?))
}

fn prompt_shipment_status() -> anyhow::Result<String> {
    println!("\nAvailable statuses: {}", wire_text(ShipmentStatus::ALL));
    prompt("Enter shipment status: ")
}

fn prompt_shipment_type() -> anyhow::Result<String> {
    println!("\nAvailable types: {}", wire_text(ShipmentType::ALL));
    prompt("Enter shipment type: ")
}

fn wire_text<T: std::fmt::Display>(all: &[T]) -> String {
    all.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read an optional inclusive date range; blank input on either endpoint
/// means no range filter.
fn prompt_date_range() -> anyhow::Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = prompt("Start date (YYYY-MM-DD, blank for none): ")?;
    let end = prompt("End date (YYYY-MM-DD, blank for none): ")?;
    let start = if start.is_empty() {
        None
    } else {
        Some(parse_date(&start)?)
    };
    let end = if end.is_empty() {
        None
    } else {
        Some(parse_date(&end)?)
    };
    Ok((start, end))
}
