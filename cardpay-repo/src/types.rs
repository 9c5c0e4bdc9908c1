//! Database row types for the SQLite adapter.
//!
//! SQLite stores UUIDs, dates and decimal amounts as TEXT; these row
//! structs parse them back into domain types on read.

use sqlx::FromRow;

use cardpay_types::{
    Card, CardId, Money, StoreError, Transaction, TransactionId, TransactionStatus,
};

/// Card row from the database.
#[derive(FromRow)]
pub struct DbCard {
    pub id: String,
    pub card_number: String,
    pub cardholder_name: String,
    pub expiration_date: String,
    pub cvv: String,
    pub balance: String,
}

/// Transaction row from the database.
#[derive(FromRow)]
pub struct DbTransaction {
    pub id: String,
    pub card_id: String,
    pub amount: String,
    pub status: String,
    pub timestamp: String,
    pub description: Option<String>,
}

/// Balance-only row for in-transaction reads.
#[derive(FromRow)]
pub struct DbBalance {
    pub balance: String,
}

pub fn parse_status(s: &str) -> Result<TransactionStatus, StoreError> {
    match s {
        "APPROVED" => Ok(TransactionStatus::Approved),
        "DECLINED" => Ok(TransactionStatus::Declined),
        "FAILED" => Ok(TransactionStatus::Failed),
        "REFUNDED" => Ok(TransactionStatus::Refunded),
        _ => Err(StoreError::Database(format!(
            "Unknown transaction status: {}",
            s
        ))),
    }
}

impl DbCard {
    /// Convert database row to domain Card.
    pub fn into_domain(self) -> Result<Card, StoreError> {
        let id = uuid::Uuid::parse_str(&self.id).map_err(|e| StoreError::Database(e.to_string()))?;

        let expiration_date: chrono::NaiveDate = self
            .expiration_date
            .parse()
            .map_err(|e: chrono::ParseError| StoreError::Database(e.to_string()))?;

        let balance: Money = self.balance.parse().map_err(StoreError::Domain)?;

        Ok(Card::from_parts(
            CardId::from_uuid(id),
            self.card_number,
            self.cardholder_name,
            expiration_date,
            self.cvv,
            balance,
        ))
    }
}

impl DbTransaction {
    /// Convert database row to domain Transaction.
    pub fn into_domain(self) -> Result<Transaction, StoreError> {
        let id = uuid::Uuid::parse_str(&self.id).map_err(|e| StoreError::Database(e.to_string()))?;

        let card_id =
            uuid::Uuid::parse_str(&self.card_id).map_err(|e| StoreError::Database(e.to_string()))?;

        let amount: Money = self.amount.parse().map_err(StoreError::Domain)?;
        let status = parse_status(&self.status)?;

        let timestamp = chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .with_timezone(&chrono::Utc);

        Ok(Transaction::from_parts(
            TransactionId::from_uuid(id),
            CardId::from_uuid(card_id),
            amount,
            status,
            timestamp,
            self.description,
        ))
    }
}
