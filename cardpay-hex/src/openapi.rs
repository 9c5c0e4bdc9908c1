//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use utoipa::OpenApi;

use cardpay_types::domain::{Card, CardId, Money, Transaction, TransactionId, TransactionStatus};
use cardpay_types::dto::{CreateCardRequest, DeletedCards, PaymentRequest, PaymentResponse};

use crate::fixtures::ScenarioCard;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Initialize valid test cards
#[utoipa::path(
    post,
    path = "/api/cards/initialize",
    tag = "cards",
    responses(
        (status = 200, description = "Cards initialized successfully", body = Vec<Card>),
        (status = 500, description = "Internal server error")
    )
)]
async fn initialize_cards() {}

/// Initialize test scenario cards
#[utoipa::path(
    post,
    path = "/api/cards/initialize-test-scenarios",
    tag = "cards",
    responses(
        (status = 200, description = "Test scenario cards initialized successfully", body = Vec<Card>),
        (status = 500, description = "Internal server error")
    )
)]
async fn initialize_scenario_cards() {}

/// Get test card scenarios information
#[utoipa::path(
    get,
    path = "/api/cards/test-scenarios",
    tag = "cards",
    responses(
        (status = 200, description = "Test scenarios information", body = inline(std::collections::BTreeMap<String, Vec<ScenarioCard>>))
    )
)]
async fn test_scenarios() {}

/// Create a new card
#[utoipa::path(
    post,
    path = "/api/cards",
    tag = "cards",
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card created successfully", body = Card),
        (status = 400, description = "Invalid card details or duplicate card number")
    )
)]
async fn create_card() {}

/// List all cards
#[utoipa::path(
    get,
    path = "/api/cards",
    tag = "cards",
    responses(
        (status = 200, description = "List of cards", body = Vec<Card>)
    )
)]
async fn list_cards() {}

/// Delete all cards
#[utoipa::path(
    delete,
    path = "/api/cards",
    tag = "cards",
    responses(
        (status = 200, description = "Cards deleted", body = DeletedCards)
    )
)]
async fn delete_cards() {}

/// Get card by number
#[utoipa::path(
    get,
    path = "/api/cards/{card_number}",
    tag = "cards",
    params(
        ("card_number" = String, Path, description = "Card number")
    ),
    responses(
        (status = 200, description = "Card details", body = Card),
        (status = 404, description = "Card not found")
    )
)]
async fn get_card() {}

/// Process a payment
#[utoipa::path(
    post,
    path = "/api/payments/process",
    tag = "payments",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Payment outcome (approved, declined or failed)", body = PaymentResponse),
        (status = 400, description = "Malformed payment request")
    )
)]
async fn process_payment() {}

/// Process a refund
#[utoipa::path(
    post,
    path = "/api/payments/refund/{transaction_id}",
    tag = "payments",
    params(
        ("transaction_id" = TransactionId, Path, description = "Transaction ID (UUID)")
    ),
    responses(
        (status = 200, description = "Refund outcome (refunded, declined or failed)", body = PaymentResponse),
        (status = 404, description = "Transaction not found")
    )
)]
async fn process_refund() {}

/// List all transactions
#[utoipa::path(
    get,
    path = "/api/payments/transactions",
    tag = "payments",
    responses(
        (status = 200, description = "List of transactions", body = Vec<Transaction>)
    )
)]
async fn list_transactions() {}

/// Get transaction by ID
#[utoipa::path(
    get,
    path = "/api/payments/transactions/{transaction_id}",
    tag = "payments",
    params(
        ("transaction_id" = TransactionId, Path, description = "Transaction ID (UUID)")
    ),
    responses(
        (status = 200, description = "Transaction details", body = Transaction),
        (status = 404, description = "Transaction not found")
    )
)]
async fn get_transaction() {}

/// Get transactions by card number
#[utoipa::path(
    get,
    path = "/api/payments/transactions/card/{card_number}",
    tag = "payments",
    params(
        ("card_number" = String, Path, description = "Card number")
    ),
    responses(
        (status = 200, description = "Transactions for the card (possibly empty)", body = Vec<Transaction>)
    )
)]
async fn transactions_for_card() {}

/// Get transaction status
#[utoipa::path(
    get,
    path = "/api/payments/status/{transaction_id}",
    tag = "payments",
    params(
        ("transaction_id" = TransactionId, Path, description = "Transaction ID (UUID)")
    ),
    responses(
        (status = 200, description = "Status string", body = String),
        (status = 404, description = "Transaction not found")
    )
)]
async fn transaction_status() {}

/// OpenAPI documentation for the card-pay API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Card Pay Simulator API",
        version = "1.0.0",
        description = "A simulated card-payment backend: manage test cards and process payments and refunds against stored balances.",
        license(name = "MIT"),
    ),
    paths(
        health,
        initialize_cards,
        initialize_scenario_cards,
        test_scenarios,
        create_card,
        list_cards,
        delete_cards,
        get_card,
        process_payment,
        process_refund,
        list_transactions,
        get_transaction,
        transactions_for_card,
        transaction_status,
    ),
    components(
        schemas(
            Card,
            CardId,
            Money,
            Transaction,
            TransactionId,
            TransactionStatus,
            CreateCardRequest,
            PaymentRequest,
            PaymentResponse,
            DeletedCards,
            ScenarioCard,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "cards", description = "Card management operations"),
        (name = "payments", description = "Payment processing and transaction queries"),
    )
)]
pub struct ApiDoc;
