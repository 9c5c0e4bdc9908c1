//! Error types for the card-pay simulator.

use rust_decimal::Decimal;

use crate::domain::TransactionStatus;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Card number already exists: {0}")]
    DuplicateCardNumber(String),

    #[error("Cannot refund a transaction with status {from}")]
    InvalidStatusTransition { from: TransactionStatus },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Store-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::from(StoreError::Domain(err))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(DomainError::ValidationError(msg)) => AppError::BadRequest(msg),
            StoreError::Domain(DomainError::DuplicateCardNumber(number)) => {
                AppError::BadRequest(format!("Card number already exists: {}", number))
            }
            StoreError::Domain(e) => AppError::BadRequest(e.to_string()),
            StoreError::NotFound => AppError::NotFound("Resource not found".into()),
            StoreError::Database(e) => AppError::Internal(e),
            StoreError::Transaction(e) => AppError::Internal(e),
            StoreError::Conflict(e) => AppError::BadRequest(e),
        }
    }
}
