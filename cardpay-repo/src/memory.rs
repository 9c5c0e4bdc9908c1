//! In-memory store adapter.
//!
//! A single mutex over the whole state is the atomicity boundary: a
//! payment or refund mutates the card and appends to the ledger under
//! one lock, so conflicting mutations against the same card serialize.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use cardpay_types::{
    Card, CardId, CardStore, Money, StoreError, Transaction, TransactionId, TransactionLedger,
    TransactionStatus,
};

#[derive(Default)]
struct Inner {
    cards: HashMap<CardId, Card>,
    transactions: Vec<Transaction>,
}

/// Zero-setup store keeping everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn insert_card(&self, card: Card) -> Result<Card, StoreError> {
        let mut inner = self.lock();
        if inner
            .cards
            .values()
            .any(|c| c.card_number == card.card_number)
        {
            return Err(StoreError::Conflict(format!(
                "Card number already exists: {}",
                card.card_number
            )));
        }
        inner.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
        let inner = self.lock();
        let mut cards: Vec<Card> = inner.cards.values().cloned().collect();
        cards.sort_by(|a, b| a.card_number.cmp(&b.card_number));
        Ok(cards)
    }

    async fn find_card_by_number(&self, card_number: &str) -> Result<Option<Card>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .cards
            .values()
            .find(|c| c.card_number == card_number)
            .cloned())
    }

    async fn delete_all_cards(&self) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let removed = inner.cards.len() as u64;
        inner.cards.clear();
        Ok(removed)
    }
}

#[async_trait]
impl TransactionLedger for MemoryStore {
    async fn record_payment(
        &self,
        card_id: CardId,
        amount: Money,
        description: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, StoreError> {
        let mut inner = self.lock();

        let card = inner.cards.get_mut(&card_id).ok_or(StoreError::NotFound)?;
        card.debit(amount).map_err(StoreError::Domain)?;

        let tx = Transaction::approved(card_id, amount, description, timestamp);
        inner.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn record_refund(&self, id: TransactionId) -> Result<Transaction, StoreError> {
        let mut inner = self.lock();

        let idx = inner
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;

        if inner.transactions[idx].status != TransactionStatus::Approved {
            return Err(StoreError::Conflict(
                "Cannot refund a non-approved transaction".into(),
            ));
        }

        let card_id = inner.transactions[idx].card_id;
        let amount = inner.transactions[idx].amount;

        let card = inner.cards.get_mut(&card_id).ok_or(StoreError::NotFound)?;
        card.credit(amount);

        inner.transactions[idx]
            .mark_refunded()
            .map_err(|e| StoreError::Conflict(e.to_string()))?;
        Ok(inner.transactions[idx].clone())
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.lock();
        Ok(inner.transactions.clone())
    }

    async fn find_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        let inner = self.lock();
        Ok(inner.transactions.iter().find(|t| t.id == id).cloned())
    }

    async fn find_transactions_by_card_number(
        &self,
        card_number: &str,
    ) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.lock();
        let Some(card) = inner.cards.values().find(|c| c.card_number == card_number) else {
            return Ok(Vec::new());
        };
        let card_id = card.id;
        Ok(inner
            .transactions
            .iter()
            .filter(|t| t.card_id == card_id)
            .cloned()
            .collect())
    }
}
