//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use cardpay_types::{
    AppError, CreateCardRequest, DeletedCards, PaymentRequest, PaymentStore, TransactionId,
};

use crate::PaymentService;
use crate::fixtures;

/// Application state shared across handlers.
pub struct AppState<S: PaymentStore> {
    pub service: PaymentService<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Card Management
// ─────────────────────────────────────────────────────────────────────────────

/// Seed the standard valid test cards, clearing existing cards first.
#[tracing::instrument(skip(state))]
pub async fn initialize_cards<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let cards = state.service.initialize_valid_cards().await?;
    tracing::info!("Initialized {} valid test cards", cards.len());
    Ok(Json(cards))
}

/// Seed the scenario test cards, clearing existing cards first.
#[tracing::instrument(skip(state))]
pub async fn initialize_scenario_cards<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let cards = state.service.initialize_scenario_cards().await?;
    tracing::info!("Initialized {} scenario test cards", cards.len());
    Ok(Json(cards))
}

/// Describe the available test-card scenarios.
pub async fn test_scenarios() -> impl IntoResponse {
    Json(fixtures::test_scenarios())
}

/// Create a new card.
#[tracing::instrument(skip(state, req), fields(card_number = %req.card_number))]
pub async fn create_card<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.service.create_card(req).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// List all cards.
#[tracing::instrument(skip(state))]
pub async fn list_cards<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let cards = state.service.list_cards().await?;
    tracing::info!("Found {} cards", cards.len());
    Ok(Json(cards))
}

/// Get a card by its card number.
#[tracing::instrument(skip(state), fields(card_number = %card_number))]
pub async fn get_card<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(card_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.service.get_card(&card_number).await?;
    Ok(Json(card))
}

/// Delete all cards.
#[tracing::instrument(skip(state))]
pub async fn delete_cards<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.service.delete_cards().await?;
    tracing::info!("Deleted {} cards", deleted);
    Ok(Json(DeletedCards { deleted }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment Processing
// ─────────────────────────────────────────────────────────────────────────────

/// Process a payment.
#[tracing::instrument(skip(state, req), fields(card_number = %req.card_number, amount = %req.amount))]
pub async fn process_payment<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.process_payment(req).await?;
    tracing::info!("Payment processed with status: {}", response.status);
    Ok(Json(response))
}

/// Refund a previously approved transaction.
#[tracing::instrument(skip(state), fields(transaction_id = %id))]
pub async fn process_refund<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction_id: TransactionId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid transaction ID".into()))?;

    let response = state.service.process_refund(transaction_id).await?;
    tracing::info!("Refund processed with status: {}", response.status);
    Ok(Json(response))
}

/// List all transactions.
#[tracing::instrument(skip(state))]
pub async fn list_transactions<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.service.list_transactions().await?;
    tracing::info!("Found {} transactions", transactions.len());
    Ok(Json(transactions))
}

/// Get a transaction by ID.
#[tracing::instrument(skip(state), fields(transaction_id = %id))]
pub async fn get_transaction<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction_id: TransactionId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid transaction ID".into()))?;

    let transaction = state.service.get_transaction(transaction_id).await?;
    Ok(Json(transaction))
}

/// List transactions for a card. Cards without history yield an empty list.
#[tracing::instrument(skip(state), fields(card_number = %card_number))]
pub async fn transactions_for_card<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(card_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.service.transactions_for_card(&card_number).await?;
    tracing::info!(
        "Found {} transactions for card: {}",
        transactions.len(),
        card_number
    );
    Ok(Json(transactions))
}

/// Get the current status of a transaction.
#[tracing::instrument(skip(state), fields(transaction_id = %id))]
pub async fn transaction_status<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction_id: TransactionId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid transaction ID".into()))?;

    let status = state.service.transaction_status(transaction_id).await?;
    Ok(status)
}
