//! Client example demonstrating full payment flows against a running server.
//!
//! Run with: cargo run -p cardpay-app --example client_example

use cardpay_client::CardPayClient;
use cardpay_hex::{PaymentService, inbound::HttpServer};
use cardpay_repo::build_store;
use rust_decimal_macros::dec;
use std::net::SocketAddr;
use tempfile::tempdir;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("cardpay.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on port {port}...");
    println!("   Database: {db_url}");

    // Build store (handles connection and migration)
    let store = build_store(&db_url).await?;

    // Start server in background
    let service = PaymentService::new(store);
    let server = HttpServer::new(service);
    let router = server.router();

    let server_addr = format!("127.0.0.1:{port}");
    tokio::spawn(async move {
        axum::serve(
            TcpListener::bind(&server_addr).await.unwrap(),
            router.into_make_service(),
        )
        .await
        .unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // Create client
    let base_url = format!("http://127.0.0.1:{port}");
    let client = CardPayClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: Full payment flow
    // ─────────────────────────────────────────────────────────────────────────

    // Health check
    let health = client.health().await?;
    println!("✅ Server health: {health}");

    // Seed the standard test cards
    let cards = client.initialize_cards().await?;
    println!("✅ Initialized {} test cards", cards.len());

    // Pay with the always-approved Visa
    let payment = client
        .process_payment(
            "4242424242424242",
            "123",
            dec!(100.00),
            Some("Payment for services"),
        )
        .await?;
    println!("✅ Payment {}: {}", payment.status, payment.message);

    let card = client.get_card("4242424242424242").await?;
    println!("   Balance: {}", card.balance);

    // Wrong CVV is declined, balance untouched
    let declined = client
        .process_payment("4242424242424242", "000", dec!(50.00), None)
        .await?;
    println!("✅ Declined as expected: {}", declined.message);

    // Refund the first payment
    let tx_id = payment
        .transaction_id
        .expect("approved payment has a transaction id");
    let refund = client.process_refund(tx_id).await?;
    println!("✅ Refund {}: {}", refund.status, refund.message);

    let card = client.get_card("4242424242424242").await?;
    println!("   Balance after refund: {}", card.balance);

    // Transaction history for the card
    let history = client.transactions_for_card("4242424242424242").await?;
    println!("\n📋 Transactions for 4242424242424242:");
    for tx in history {
        println!("   - {} {} {}", tx.id, tx.status, tx.amount);
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
