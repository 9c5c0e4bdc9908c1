//! # CardPay Client SDK
//!
//! A typed Rust client for the card-pay API.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use cardpay_types::{
    Card, CreateCardRequest, DeletedCards, PaymentRequest, PaymentResponse, Transaction,
    TransactionId,
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Card-pay API client.
pub struct CardPayClient {
    base_url: String,
    http: Client,
}

impl CardPayClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cards
    // ─────────────────────────────────────────────────────────────────────────

    /// Seeds the standard valid test cards, clearing existing cards first.
    pub async fn initialize_cards(&self) -> Result<Vec<Card>, ClientError> {
        self.post_empty("/api/cards/initialize").await
    }

    /// Seeds the scenario test cards, clearing existing cards first.
    pub async fn initialize_test_scenarios(&self) -> Result<Vec<Card>, ClientError> {
        self.post_empty("/api/cards/initialize-test-scenarios").await
    }

    /// Fetches the test-card scenario information map.
    pub async fn test_scenarios(&self) -> Result<serde_json::Value, ClientError> {
        self.get("/api/cards/test-scenarios").await
    }

    /// Creates a new card.
    pub async fn create_card(&self, req: CreateCardRequest) -> Result<Card, ClientError> {
        self.post("/api/cards", &req).await
    }

    /// Lists all cards.
    pub async fn list_cards(&self) -> Result<Vec<Card>, ClientError> {
        self.get("/api/cards").await
    }

    /// Gets a card by its card number.
    pub async fn get_card(&self, card_number: &str) -> Result<Card, ClientError> {
        self.get(&format!("/api/cards/{}", card_number)).await
    }

    /// Deletes all cards, returning the number removed.
    pub async fn delete_cards(&self) -> Result<u64, ClientError> {
        let resp = self
            .http
            .delete(format!("{}/api/cards", self.base_url))
            .send()
            .await?;
        let deleted: DeletedCards = self.handle_response(resp).await?;
        Ok(deleted.deleted)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────

    /// Processes a payment against a stored card.
    pub async fn process_payment(
        &self,
        card_number: &str,
        cvv: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<PaymentResponse, ClientError> {
        let req = PaymentRequest {
            card_number: card_number.to_string(),
            cvv: cvv.to_string(),
            amount,
            description: description.map(String::from),
        };
        self.post("/api/payments/process", &req).await
    }

    /// Refunds a previously approved transaction.
    pub async fn process_refund(
        &self,
        id: TransactionId,
    ) -> Result<PaymentResponse, ClientError> {
        self.post_empty(&format!("/api/payments/refund/{}", id))
            .await
    }

    /// Lists all transactions.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        self.get("/api/payments/transactions").await
    }

    /// Gets a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, ClientError> {
        self.get(&format!("/api/payments/transactions/{}", id)).await
    }

    /// Lists transactions for a card (possibly empty).
    pub async fn transactions_for_card(
        &self,
        card_number: &str,
    ) -> Result<Vec<Transaction>, ClientError> {
        self.get(&format!("/api/payments/transactions/card/{}", card_number))
            .await
    }

    /// Gets the status string of a transaction.
    ///
    /// The endpoint returns plain text, not JSON.
    pub async fn transaction_status(&self, id: TransactionId) -> Result<String, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/payments/status/{}", self.base_url, id))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(api_error(
                status.as_u16(),
                resp.text().await.unwrap_or_default(),
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), body))
        }
    }
}

fn api_error(status: u16, body: String) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(body);
    ClientError::Api { status, message }
}
