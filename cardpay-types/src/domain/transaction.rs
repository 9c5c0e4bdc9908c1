//! Transaction domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::card::CardId;
use super::money::Money;
use crate::error::DomainError;

/// Unique identifier for a Transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random TransactionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TransactionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Outcome status of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Payment passed every check and the card was debited
    Approved,
    /// Business rejection (expired card, CVV mismatch, insufficient funds)
    Declined,
    /// System error during processing
    Failed,
    /// A previously approved payment that has been reversed
    Refunded,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Approved => write!(f, "APPROVED"),
            TransactionStatus::Declined => write!(f, "DECLINED"),
            TransactionStatus::Failed => write!(f, "FAILED"),
            TransactionStatus::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// A recorded payment against a card.
///
/// Transactions are persisted only for approved payments; declines and
/// failures produce a response but no record. Once written, the only
/// permitted change is the one-way transition to Refunded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// The card this transaction debited
    pub card_id: CardId,
    /// Amount charged (positive)
    pub amount: Money,
    /// Current status
    pub status: TransactionStatus,
    /// When the payment was approved
    pub timestamp: DateTime<Utc>,
    /// Optional free-text description
    pub description: Option<String>,
}

impl Transaction {
    /// Creates a newly approved transaction.
    pub fn approved(
        card_id: CardId,
        amount: Money,
        description: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            card_id,
            amount,
            status: TransactionStatus::Approved,
            timestamp,
            description,
        }
    }

    /// Reconstructs a transaction from database fields.
    pub fn from_parts(
        id: TransactionId,
        card_id: CardId,
        amount: Money,
        status: TransactionStatus,
        timestamp: DateTime<Utc>,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            card_id,
            amount,
            status,
            timestamp,
            description,
        }
    }

    /// Transitions the transaction to Refunded.
    ///
    /// Only an Approved transaction can be refunded; the transition is
    /// one-way and terminal.
    pub fn mark_refunded(&mut self) -> Result<(), DomainError> {
        if self.status != TransactionStatus::Approved {
            return Err(DomainError::InvalidStatusTransition { from: self.status });
        }
        self.status = TransactionStatus::Refunded;
        Ok(())
    }
}
