//! Store port traits.
//!
//! These are the primary ports in our hexagonal architecture.
//! Adapters (SQLite, in-memory) implement both traits over the same
//! backing storage, since payment and refund mutations span a card and
//! a transaction record.

use chrono::{DateTime, Utc};

use crate::domain::{Card, CardId, Money, Transaction, TransactionId};
use crate::error::StoreError;

/// Storage for card records, keyed by card number.
///
/// The store enforces exactly one invariant of its own: card-number
/// uniqueness. Field validation happens at the boundary before a card
/// reaches the store.
#[async_trait::async_trait]
pub trait CardStore: Send + Sync + 'static {
    /// Persists a new card. Fails with a conflict when the card number
    /// is already taken.
    async fn insert_card(&self, card: Card) -> Result<Card, StoreError>;

    /// Lists all cards.
    async fn list_cards(&self) -> Result<Vec<Card>, StoreError>;

    /// Finds a card by its card number.
    async fn find_card_by_number(&self, card_number: &str) -> Result<Option<Card>, StoreError>;

    /// Deletes every card, returning the number removed.
    async fn delete_all_cards(&self) -> Result<u64, StoreError>;
}

/// Append-mostly storage for payment transactions.
///
/// The two mutating operations MUST be atomic: the balance change and
/// the transaction write both become visible or neither does.
/// Implementations use a database transaction (or a single lock) to
/// serialize conflicting mutations against the same card.
#[async_trait::async_trait]
pub trait TransactionLedger: Send + Sync + 'static {
    /// Debits the card and appends an approved transaction, atomically.
    ///
    /// Re-checks balance sufficiency inside the store transaction, so
    /// concurrent payments against one card cannot overdraw it.
    async fn record_payment(
        &self,
        card_id: CardId,
        amount: Money,
        description: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, StoreError>;

    /// Credits the referenced card by the transaction amount and flips
    /// the status to Refunded, atomically.
    ///
    /// Guarded: only an Approved transaction transitions; anything else
    /// is a conflict.
    async fn record_refund(&self, id: TransactionId) -> Result<Transaction, StoreError>;

    /// Lists all transactions.
    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Gets a transaction by ID.
    async fn find_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Lists transactions for a card, joining through the card number.
    /// Cards with no history yield an empty list, not an error.
    async fn find_transactions_by_card_number(
        &self,
        card_number: &str,
    ) -> Result<Vec<Transaction>, StoreError>;
}

/// Everything the payment service needs from storage.
pub trait PaymentStore: CardStore + TransactionLedger {}

impl<T: CardStore + TransactionLedger> PaymentStore for T {}
