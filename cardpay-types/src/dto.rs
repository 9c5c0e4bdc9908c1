//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Transaction, TransactionId, TransactionStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Card DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCardRequest {
    /// Card number (digit string)
    #[schema(example = "4242424242424242")]
    pub card_number: String,
    /// Name of the cardholder
    #[schema(example = "John Doe")]
    pub cardholder_name: String,
    /// Expiration date; must be in the future at creation time
    pub expiration_date: NaiveDate,
    /// 3 or 4-digit verification code
    #[schema(example = "123")]
    pub cvv: String,
    /// Opening balance (non-negative, at most 2 decimal places)
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
}

/// Response after bulk card deletion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedCards {
    /// Number of cards removed
    #[schema(example = 4)]
    pub deleted: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to process a payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// 16-digit card number
    #[schema(example = "4242424242424242")]
    pub card_number: String,
    /// 3 or 4-digit CVV code
    #[schema(example = "123")]
    pub cvv: String,
    /// Payment amount (positive, at most 2 decimal places)
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    /// Optional payment description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Payment for services")]
    pub description: Option<String>,
}

/// Outcome of a payment or refund attempt.
///
/// Declines and failures are carried in this payload with a non-approved
/// status; they are not transport-level errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    /// Outcome status
    pub status: TransactionStatus,
    /// Human-readable outcome message
    #[schema(example = "Payment processed successfully")]
    pub message: String,
    /// Identifier of the persisted transaction, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    /// Timestamp of the persisted transaction, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PaymentResponse {
    /// Successful payment outcome carrying the new transaction.
    pub fn approved(tx: &Transaction) -> Self {
        Self {
            status: TransactionStatus::Approved,
            message: "Payment processed successfully".into(),
            transaction_id: Some(tx.id),
            timestamp: Some(tx.timestamp),
        }
    }

    /// Business rejection; nothing was persisted.
    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            status: TransactionStatus::Declined,
            message: message.into(),
            transaction_id: None,
            timestamp: None,
        }
    }

    /// System failure; nothing was persisted.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TransactionStatus::Failed,
            message: message.into(),
            transaction_id: None,
            timestamp: None,
        }
    }

    /// Successful refund outcome for the reversed transaction.
    pub fn refunded(tx: &Transaction) -> Self {
        Self {
            status: TransactionStatus::Refunded,
            message: "Refund processed successfully".into(),
            transaction_id: Some(tx.id),
            timestamp: Some(tx.timestamp),
        }
    }
}
