//! Payment Application Service
//!
//! Orchestrates domain operations through the store ports.
//! Contains NO infrastructure logic - pure business orchestration.

use std::sync::Arc;

use rust_decimal::Decimal;

use cardpay_types::{
    AppError, Card, Clock, CreateCardRequest, Money, PaymentRequest, PaymentResponse,
    PaymentStore, SystemClock, Transaction, TransactionId, TransactionStatus,
};

use crate::fixtures;

/// Application service for the card-pay simulator.
///
/// Generic over `S: PaymentStore` - the adapter is injected at compile time.
/// This enables:
/// - Swapping stores without code changes
/// - Testing with an in-memory store
/// - Compile-time checks for port implementation
///
/// Time is read through the [`Clock`] port so expiry checks are testable.
pub struct PaymentService<S: PaymentStore> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: PaymentStore> PaymentService<S> {
    /// Creates a new payment service over the given store, on system time.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a payment service with an explicit clock (for tests).
    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Card Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a new card after boundary validation.
    pub async fn create_card(&self, req: CreateCardRequest) -> Result<Card, AppError> {
        if req.expiration_date <= self.clock.today() {
            return Err(AppError::BadRequest("Card must not be expired".into()));
        }

        if req.balance.normalize().scale() > 2 {
            return Err(AppError::BadRequest(
                "Balance must have at most 2 decimal places".into(),
            ));
        }

        let balance = Money::new(req.balance)
            .map_err(|_| AppError::BadRequest("Balance must be greater than or equal to 0".into()))?;

        let card = Card::new(
            req.card_number,
            req.cardholder_name,
            req.expiration_date,
            req.cvv,
            balance,
        )?;

        self.store.insert_card(card).await.map_err(Into::into)
    }

    /// Lists all cards.
    pub async fn list_cards(&self) -> Result<Vec<Card>, AppError> {
        self.store.list_cards().await.map_err(Into::into)
    }

    /// Gets a card by its card number.
    pub async fn get_card(&self, card_number: &str) -> Result<Card, AppError> {
        self.store
            .find_card_by_number(card_number)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Card {}", card_number))))
    }

    /// Deletes every card, returning the number removed.
    pub async fn delete_cards(&self) -> Result<u64, AppError> {
        self.store.delete_all_cards().await.map_err(Into::into)
    }

    /// Replaces all cards with the given seed set.
    ///
    /// Fixture path: seed cards bypass the create-time expiry rule, since
    /// the scenario set deliberately contains expired cards.
    pub async fn seed_cards(&self, cards: Vec<Card>) -> Result<Vec<Card>, AppError> {
        self.store.delete_all_cards().await?;

        let mut seeded = Vec::with_capacity(cards.len());
        for card in cards {
            seeded.push(self.store.insert_card(card).await?);
        }
        Ok(seeded)
    }

    /// Seeds the standard set of valid test cards.
    pub async fn initialize_valid_cards(&self) -> Result<Vec<Card>, AppError> {
        self.seed_cards(fixtures::valid_cards(self.clock.today()))
            .await
    }

    /// Seeds the scenario test cards (approvals, declines, errors).
    pub async fn initialize_scenario_cards(&self) -> Result<Vec<Card>, AppError> {
        self.seed_cards(fixtures::scenario_cards(self.clock.today()))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment Authorization
    // ─────────────────────────────────────────────────────────────────────────────

    /// Processes a payment against a stored card.
    ///
    /// The checks run in a fixed order - card lookup, expiry, CVV, funds -
    /// and short-circuit at the first failure; the order determines the
    /// decline message callers see. Declines and failures are returned as
    /// successful calls carrying the outcome status, never as `Err`.
    pub async fn process_payment(
        &self,
        req: PaymentRequest,
    ) -> Result<PaymentResponse, AppError> {
        validate_payment_request(&req)?;

        let amount = Money::new(req.amount)?;

        let card = match self.store.find_card_by_number(&req.card_number).await {
            Ok(Some(card)) => card,
            // The original classifies an unknown card as FAILED rather
            // than a decline; callers rely on the message.
            Ok(None) => return Ok(PaymentResponse::failed("Card not found")),
            Err(e) => {
                return Ok(PaymentResponse::failed(format!(
                    "Payment processing failed: {}",
                    e
                )));
            }
        };

        if card.is_expired(self.clock.today()) {
            return Ok(PaymentResponse::declined("Card is expired"));
        }

        if card.cvv != req.cvv {
            return Ok(PaymentResponse::declined("Invalid CVV"));
        }

        if card.balance < amount {
            return Ok(PaymentResponse::declined("Insufficient funds"));
        }

        match self
            .store
            .record_payment(card.id, amount, req.description, self.clock.now())
            .await
        {
            Ok(tx) => Ok(PaymentResponse::approved(&tx)),
            Err(e) => Ok(PaymentResponse::failed(format!(
                "Payment processing failed: {}",
                e
            ))),
        }
    }

    /// Refunds a previously approved payment.
    ///
    /// An unknown transaction id is a NotFound error; refunding anything
    /// that is not currently Approved is a DECLINED outcome.
    pub async fn process_refund(&self, id: TransactionId) -> Result<PaymentResponse, AppError> {
        let tx = self
            .store
            .find_transaction(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Transaction {}", id)))?;

        if tx.status != TransactionStatus::Approved {
            return Ok(PaymentResponse::declined(
                "Cannot refund a non-approved transaction",
            ));
        }

        match self.store.record_refund(id).await {
            Ok(refunded) => Ok(PaymentResponse::refunded(&refunded)),
            Err(e) => Ok(PaymentResponse::failed(format!(
                "Refund processing failed: {}",
                e
            ))),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transaction Queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists all transactions.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.store.list_transactions().await.map_err(Into::into)
    }

    /// Gets a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        self.store
            .find_transaction(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Transaction {}", id))))
    }

    /// Lists transactions for a card. A card with no history (or an
    /// unknown number) yields an empty list; the caller decides what
    /// that means at the transport level.
    pub async fn transactions_for_card(
        &self,
        card_number: &str,
    ) -> Result<Vec<Transaction>, AppError> {
        self.store
            .find_transactions_by_card_number(card_number)
            .await
            .map_err(Into::into)
    }

    /// Gets the status string of a transaction.
    pub async fn transaction_status(&self, id: TransactionId) -> Result<String, AppError> {
        Ok(self.get_transaction(id).await?.status.to_string())
    }
}

fn validate_payment_request(req: &PaymentRequest) -> Result<(), AppError> {
    if req.card_number.len() != 16 || !req.card_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest("Card number must be 16 digits".into()));
    }

    if !(3..=4).contains(&req.cvv.len()) || !req.cvv.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest("CVV must be 3 or 4 digits".into()));
    }

    if req.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Amount must be greater than 0".into()));
    }

    if req.amount.normalize().scale() > 2 {
        return Err(AppError::BadRequest(
            "Amount must have at most 2 decimal places".into(),
        ));
    }

    if let Some(description) = &req.description {
        if description.chars().count() > 255 {
            return Err(AppError::BadRequest(
                "Description must not exceed 255 characters".into(),
            ));
        }
    }

    Ok(())
}
