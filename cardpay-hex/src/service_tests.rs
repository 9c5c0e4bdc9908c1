//! PaymentService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use cardpay_types::{
        AppError, Card, CardId, CardStore, Clock, CreateCardRequest, Money, PaymentRequest,
        StoreError, Transaction, TransactionId, TransactionLedger, TransactionStatus,
    };

    use crate::PaymentService;

    /// Simple in-memory store for testing the service layer.
    pub struct MockStore {
        cards: Mutex<HashMap<CardId, Card>>,
        transactions: Mutex<Vec<Transaction>>,
        /// When set, mutating ledger calls fail as if the store were down.
        fail_mutations: bool,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self {
                cards: Mutex::new(HashMap::new()),
                transactions: Mutex::new(Vec::new()),
                fail_mutations: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                fail_mutations: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl CardStore for MockStore {
        async fn insert_card(&self, card: Card) -> Result<Card, StoreError> {
            let mut cards = self.cards.lock().unwrap();
            if cards.values().any(|c| c.card_number == card.card_number) {
                return Err(StoreError::Conflict(format!(
                    "Card number already exists: {}",
                    card.card_number
                )));
            }
            cards.insert(card.id, card.clone());
            Ok(card)
        }

        async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
            Ok(self.cards.lock().unwrap().values().cloned().collect())
        }

        async fn find_card_by_number(
            &self,
            card_number: &str,
        ) -> Result<Option<Card>, StoreError> {
            Ok(self
                .cards
                .lock()
                .unwrap()
                .values()
                .find(|c| c.card_number == card_number)
                .cloned())
        }

        async fn delete_all_cards(&self) -> Result<u64, StoreError> {
            let mut cards = self.cards.lock().unwrap();
            let removed = cards.len() as u64;
            cards.clear();
            Ok(removed)
        }
    }

    #[async_trait]
    impl TransactionLedger for MockStore {
        async fn record_payment(
            &self,
            card_id: CardId,
            amount: Money,
            description: Option<String>,
            timestamp: DateTime<Utc>,
        ) -> Result<Transaction, StoreError> {
            if self.fail_mutations {
                return Err(StoreError::Database("store unavailable".into()));
            }

            let mut cards = self.cards.lock().unwrap();
            let card = cards.get_mut(&card_id).ok_or(StoreError::NotFound)?;
            card.debit(amount).map_err(StoreError::Domain)?;

            let tx = Transaction::approved(card_id, amount, description, timestamp);
            self.transactions.lock().unwrap().push(tx.clone());
            Ok(tx)
        }

        async fn record_refund(&self, id: TransactionId) -> Result<Transaction, StoreError> {
            if self.fail_mutations {
                return Err(StoreError::Database("store unavailable".into()));
            }

            let mut transactions = self.transactions.lock().unwrap();
            let tx = transactions
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(StoreError::NotFound)?;

            tx.mark_refunded()
                .map_err(|e| StoreError::Conflict(e.to_string()))?;

            let mut cards = self.cards.lock().unwrap();
            let card = cards.get_mut(&tx.card_id).ok_or(StoreError::NotFound)?;
            card.credit(tx.amount);
            Ok(tx.clone())
        }

        async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
            Ok(self.transactions.lock().unwrap().clone())
        }

        async fn find_transaction(
            &self,
            id: TransactionId,
        ) -> Result<Option<Transaction>, StoreError> {
            Ok(self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == id)
                .cloned())
        }

        async fn find_transactions_by_card_number(
            &self,
            card_number: &str,
        ) -> Result<Vec<Transaction>, StoreError> {
            let cards = self.cards.lock().unwrap();
            let Some(card) = cards.values().find(|c| c.card_number == card_number) else {
                return Ok(Vec::new());
            };
            let card_id = card.id;
            Ok(self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.card_id == card_id)
                .cloned()
                .collect())
        }
    }

    /// Clock pinned to a known instant.
    struct FixedClock {
        now: DateTime<Utc>,
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.now
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock {
            now: Utc.with_ymd_and_hms(2024, 3, 20, 10, 30, 0).unwrap(),
        })
    }

    fn service() -> PaymentService<MockStore> {
        PaymentService::with_clock(MockStore::new(), fixed_clock())
    }

    async fn seed_card(
        service: &PaymentService<MockStore>,
        number: &str,
        cvv: &str,
        expiry: NaiveDate,
        balance: Decimal,
    ) -> Card {
        service
            .store()
            .insert_card(Card::from_parts(
                CardId::new(),
                number.to_string(),
                "Test Holder".to_string(),
                expiry,
                cvv.to_string(),
                Money::new(balance).unwrap(),
            ))
            .await
            .unwrap()
    }

    fn pay(number: &str, cvv: &str, amount: Decimal) -> PaymentRequest {
        PaymentRequest {
            card_number: number.to_string(),
            cvv: cvv.to_string(),
            amount,
            description: None,
        }
    }

    fn future() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment authorization
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_payment_approved_debits_balance() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;

        let response = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Approved);
        assert_eq!(response.message, "Payment processed successfully");
        assert!(response.transaction_id.is_some());

        let card = service.get_card("4242424242424242").await.unwrap();
        assert_eq!(card.balance.amount(), dec!(900.00));

        let transactions = service.list_transactions().await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].status, TransactionStatus::Approved);
        assert_eq!(transactions[0].amount.amount(), dec!(100.00));
        assert_eq!(transactions[0].card_id, card.id);
    }

    #[tokio::test]
    async fn test_payment_invalid_cvv_declined() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;

        let response = service
            .process_payment(pay("4242424242424242", "000", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Declined);
        assert_eq!(response.message, "Invalid CVV");
        assert!(response.transaction_id.is_none());

        // Nothing mutated, nothing persisted
        let card = service.get_card("4242424242424242").await.unwrap();
        assert_eq!(card.balance.amount(), dec!(1000.00));
        assert!(service.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_insufficient_funds_declined() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(10.00)).await;

        let response = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Declined);
        assert_eq!(response.message, "Insufficient funds");
        assert!(service.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_expired_card_declined() {
        let service = service();
        let yesterday = today().pred_opt().unwrap();
        seed_card(&service, "4242424242424242", "123", yesterday, dec!(1000.00)).await;

        let response = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Declined);
        assert_eq!(response.message, "Card is expired");
    }

    #[tokio::test]
    async fn test_payment_expiring_today_declined() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", today(), dec!(1000.00)).await;

        let response = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Declined);
        assert_eq!(response.message, "Card is expired");
    }

    #[tokio::test]
    async fn test_check_order_expiry_before_cvv_and_funds() {
        let service = service();
        // Expired card, wrong CVV and insufficient funds at once: the
        // expiry message wins.
        let yesterday = today().pred_opt().unwrap();
        seed_card(&service, "4242424242424242", "123", yesterday, dec!(1.00)).await;

        let response = service
            .process_payment(pay("4242424242424242", "999", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.message, "Card is expired");
    }

    #[tokio::test]
    async fn test_check_order_cvv_before_funds() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(1.00)).await;

        let response = service
            .process_payment(pay("4242424242424242", "999", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.message, "Invalid CVV");
    }

    #[tokio::test]
    async fn test_payment_unknown_card_fails() {
        let service = service();

        let response = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Failed);
        assert_eq!(response.message, "Card not found");
        assert!(service.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_store_failure_reported_as_failed() {
        let service = PaymentService::with_clock(MockStore::failing(), fixed_clock());
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;

        let response = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();

        assert_eq!(response.status, TransactionStatus::Failed);
        assert!(response.message.starts_with("Payment processing failed:"));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment request validation
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_payment_short_card_number_rejected() {
        let service = service();

        let result = service
            .process_payment(pay("378282246310005", "789", dec!(10.00)))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_payment_bad_cvv_format_rejected() {
        let service = service();

        let result = service
            .process_payment(pay("4242424242424242", "12", dec!(10.00)))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_payment_zero_amount_rejected() {
        let service = service();

        let result = service
            .process_payment(pay("4242424242424242", "123", dec!(0.00)))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_payment_three_decimal_places_rejected() {
        let service = service();

        let result = service
            .process_payment(pay("4242424242424242", "123", dec!(10.005)))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_payment_long_description_rejected() {
        let service = service();

        let mut req = pay("4242424242424242", "123", dec!(10.00));
        req.description = Some("x".repeat(256));

        let result = service.process_payment(req).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Refunds
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_refund_restores_balance_and_flips_status() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;

        let payment = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();
        let tx_id = payment.transaction_id.unwrap();

        let response = service.process_refund(tx_id).await.unwrap();

        assert_eq!(response.status, TransactionStatus::Refunded);
        assert_eq!(response.transaction_id, Some(tx_id));

        let card = service.get_card("4242424242424242").await.unwrap();
        assert_eq!(card.balance.amount(), dec!(1000.00));

        let tx = service.get_transaction(tx_id).await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Refunded);
    }

    #[tokio::test]
    async fn test_second_refund_declined() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;

        let payment = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();
        let tx_id = payment.transaction_id.unwrap();

        service.process_refund(tx_id).await.unwrap();
        let again = service.process_refund(tx_id).await.unwrap();

        assert_eq!(again.status, TransactionStatus::Declined);
        assert_eq!(again.message, "Cannot refund a non-approved transaction");

        // Credited exactly once
        let card = service.get_card("4242424242424242").await.unwrap();
        assert_eq!(card.balance.amount(), dec!(1000.00));
    }

    #[tokio::test]
    async fn test_refund_unknown_transaction_not_found() {
        let service = service();

        let result = service.process_refund(TransactionId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_refund_store_failure_reported_as_failed() {
        let service = PaymentService::with_clock(MockStore::failing(), fixed_clock());
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;

        // Plant an approved transaction directly; the failing store only
        // rejects mutations.
        let tx = Transaction::approved(
            CardId::new(),
            Money::new(dec!(10.00)).unwrap(),
            None,
            Utc::now(),
        );
        service.store().transactions.lock().unwrap().push(tx.clone());

        let response = service.process_refund(tx.id).await.unwrap();

        assert_eq!(response.status, TransactionStatus::Failed);
        assert!(response.message.starts_with("Refund processing failed:"));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Balance invariant
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_balance_never_negative_across_sequence() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(100.00)).await;

        let mut refundable = Vec::new();
        for amount in [dec!(40.00), dec!(40.00), dec!(40.00), dec!(40.00)] {
            let response = service
                .process_payment(pay("4242424242424242", "123", amount))
                .await
                .unwrap();
            if let Some(id) = response.transaction_id {
                refundable.push(id);
            }

            let card = service.get_card("4242424242424242").await.unwrap();
            assert!(card.balance.amount() >= Decimal::ZERO);
        }

        // Only two of the four 40.00 payments fit into 100.00
        assert_eq!(refundable.len(), 2);

        for id in refundable {
            service.process_refund(id).await.unwrap();
            let card = service.get_card("4242424242424242").await.unwrap();
            assert!(card.balance.amount() >= Decimal::ZERO);
        }

        let card = service.get_card("4242424242424242").await.unwrap();
        assert_eq!(card.balance.amount(), dec!(100.00));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Card CRUD
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_card_success() {
        let service = service();

        let card = service
            .create_card(CreateCardRequest {
                card_number: "4242424242424242".to_string(),
                cardholder_name: "John Doe".to_string(),
                expiration_date: future(),
                cvv: "123".to_string(),
                balance: dec!(1000.00),
            })
            .await
            .unwrap();

        assert_eq!(card.card_number, "4242424242424242");
        assert_eq!(card.balance.amount(), dec!(1000.00));
    }

    #[tokio::test]
    async fn test_create_card_past_expiry_rejected() {
        let service = service();

        let result = service
            .create_card(CreateCardRequest {
                card_number: "4242424242424242".to_string(),
                cardholder_name: "John Doe".to_string(),
                expiration_date: today().pred_opt().unwrap(),
                cvv: "123".to_string(),
                balance: dec!(1000.00),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_card_negative_balance_rejected() {
        let service = service();

        let result = service
            .create_card(CreateCardRequest {
                card_number: "4242424242424242".to_string(),
                cardholder_name: "John Doe".to_string(),
                expiration_date: future(),
                cvv: "123".to_string(),
                balance: dec!(-1.00),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_card_duplicate_number_rejected() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(0.00)).await;

        let result = service
            .create_card(CreateCardRequest {
                card_number: "4242424242424242".to_string(),
                cardholder_name: "Jane Smith".to_string(),
                expiration_date: future(),
                cvv: "456".to_string(),
                balance: dec!(0.00),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_card_not_found() {
        let service = service();

        let result = service.get_card("0000000000000000").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_initialize_valid_cards_replaces_existing() {
        let service = service();
        seed_card(&service, "9999999999999999", "999", future(), dec!(1.00)).await;

        let cards = service.initialize_valid_cards().await.unwrap();

        assert_eq!(cards.len(), 4);
        let listed = service.list_cards().await.unwrap();
        assert_eq!(listed.len(), 4);
        assert!(listed.iter().all(|c| c.card_number != "9999999999999999"));
    }

    #[tokio::test]
    async fn test_initialize_scenario_cards_seeds_ten() {
        let service = service();

        let cards = service.initialize_scenario_cards().await.unwrap();

        assert_eq!(cards.len(), 10);
        // The expired scenario cards actually decline payments
        let response = service
            .process_payment(pay("4000000000000127", "321", dec!(10.00)))
            .await
            .unwrap();
        assert_eq!(response.message, "Card is expired");
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transaction queries
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_transactions_for_card_empty_for_unknown_card() {
        let service = service();

        let transactions = service
            .transactions_for_card("0000000000000000")
            .await
            .unwrap();

        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn test_transactions_for_card_lists_history() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;
        seed_card(&service, "5555555555554444", "456", future(), dec!(500.00)).await;

        service
            .process_payment(pay("4242424242424242", "123", dec!(10.00)))
            .await
            .unwrap();
        service
            .process_payment(pay("4242424242424242", "123", dec!(20.00)))
            .await
            .unwrap();
        service
            .process_payment(pay("5555555555554444", "456", dec!(30.00)))
            .await
            .unwrap();

        let transactions = service
            .transactions_for_card("4242424242424242")
            .await
            .unwrap();

        assert_eq!(transactions.len(), 2);
    }

    #[tokio::test]
    async fn test_transaction_status() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;

        let payment = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();
        let tx_id = payment.transaction_id.unwrap();

        assert_eq!(service.transaction_status(tx_id).await.unwrap(), "APPROVED");

        service.process_refund(tx_id).await.unwrap();
        assert_eq!(service.transaction_status(tx_id).await.unwrap(), "REFUNDED");
    }

    #[tokio::test]
    async fn test_transaction_status_not_found() {
        let service = service();

        let result = service.transaction_status(TransactionId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_approved_transaction_uses_clock_timestamp() {
        let service = service();
        seed_card(&service, "4242424242424242", "123", future(), dec!(1000.00)).await;

        let payment = service
            .process_payment(pay("4242424242424242", "123", dec!(100.00)))
            .await
            .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 3, 20, 10, 30, 0).unwrap();
        assert_eq!(payment.timestamp, Some(expected));
    }
}
