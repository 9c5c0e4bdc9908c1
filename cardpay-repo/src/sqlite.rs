//! SQLite store adapter.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use cardpay_types::{
    Card, CardId, CardStore, Money, StoreError, Transaction, TransactionId, TransactionLedger,
};

use crate::types::{DbBalance, DbCard, DbTransaction};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Store
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite store implementation.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new SQLite store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Card store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CardStore for SqliteStore {
    async fn insert_card(&self, card: Card) -> Result<Card, StoreError> {
        let result = sqlx::query(
            r#"INSERT INTO cards (id, card_number, cardholder_name, expiration_date, cvv, balance)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(card.id.to_string())
        .bind(&card.card_number)
        .bind(&card.cardholder_name)
        .bind(card.expiration_date.to_string())
        .bind(&card.cvv)
        .bind(card.balance.to_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(card),
            Err(e) => {
                let unique = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if unique {
                    Err(StoreError::Conflict(format!(
                        "Card number already exists: {}",
                        card.card_number
                    )))
                } else {
                    Err(StoreError::Database(e.to_string()))
                }
            }
        }
    }

    async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
        let rows: Vec<DbCard> = sqlx::query_as(
            r#"SELECT id, card_number, cardholder_name, expiration_date, cvv, balance
               FROM cards ORDER BY card_number"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(DbCard::into_domain).collect()
    }

    async fn find_card_by_number(&self, card_number: &str) -> Result<Option<Card>, StoreError> {
        let row: Option<DbCard> = sqlx::query_as(
            r#"SELECT id, card_number, cardholder_name, expiration_date, cvv, balance
               FROM cards WHERE card_number = ?"#,
        )
        .bind(card_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(DbCard::into_domain).transpose()
    }

    async fn delete_all_cards(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(r#"DELETE FROM cards"#)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction ledger implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TransactionLedger for SqliteStore {
    async fn record_payment(
        &self,
        card_id: CardId,
        amount: Money,
        description: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, StoreError> {
        let card_id_str = card_id.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        let row: Option<DbBalance> = sqlx::query_as(r#"SELECT balance FROM cards WHERE id = ?"#)
            .bind(&card_id_str)
            .fetch_optional(&mut *db_tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = row.ok_or(StoreError::NotFound)?;
        let balance: Money = row.balance.parse().map_err(StoreError::Domain)?;

        // Re-check sufficiency inside the transaction; concurrent payments
        // against the same card serialize here.
        let new_balance = balance.checked_sub(amount).map_err(StoreError::Domain)?;

        sqlx::query(r#"UPDATE cards SET balance = ? WHERE id = ?"#)
            .bind(new_balance.to_string())
            .bind(&card_id_str)
            .execute(&mut *db_tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let tx = Transaction::approved(card_id, amount, description, timestamp);

        sqlx::query(
            r#"INSERT INTO transactions (id, card_id, amount, status, timestamp, description)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(tx.id.to_string())
        .bind(&card_id_str)
        .bind(tx.amount.to_string())
        .bind(tx.status.to_string())
        .bind(tx.timestamp.to_rfc3339())
        .bind(&tx.description)
        .execute(&mut *db_tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        Ok(tx)
    }

    async fn record_refund(&self, id: TransactionId) -> Result<Transaction, StoreError> {
        let id_str = id.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        let row: Option<DbTransaction> = sqlx::query_as(
            r#"SELECT id, card_id, amount, status, timestamp, description
               FROM transactions WHERE id = ?"#,
        )
        .bind(&id_str)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut tx = row.ok_or(StoreError::NotFound)?.into_domain()?;

        // Status guard: only an Approved transaction transitions.
        tx.mark_refunded()
            .map_err(|e| StoreError::Conflict(e.to_string()))?;

        let card_id_str = tx.card_id.to_string();

        let row: Option<DbBalance> = sqlx::query_as(r#"SELECT balance FROM cards WHERE id = ?"#)
            .bind(&card_id_str)
            .fetch_optional(&mut *db_tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let balance: Money = row
            .ok_or(StoreError::NotFound)?
            .balance
            .parse()
            .map_err(StoreError::Domain)?;
        let new_balance = balance.saturating_add(tx.amount);

        sqlx::query(r#"UPDATE cards SET balance = ? WHERE id = ?"#)
            .bind(new_balance.to_string())
            .bind(&card_id_str)
            .execute(&mut *db_tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        sqlx::query(r#"UPDATE transactions SET status = ? WHERE id = ?"#)
            .bind(tx.status.to_string())
            .bind(&id_str)
            .execute(&mut *db_tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        Ok(tx)
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows: Vec<DbTransaction> = sqlx::query_as(
            r#"SELECT id, card_id, amount, status, timestamp, description
               FROM transactions ORDER BY timestamp DESC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }

    async fn find_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        let id_str = id.to_string();

        let row: Option<DbTransaction> = sqlx::query_as(
            r#"SELECT id, card_id, amount, status, timestamp, description
               FROM transactions WHERE id = ?"#,
        )
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(DbTransaction::into_domain).transpose()
    }

    async fn find_transactions_by_card_number(
        &self,
        card_number: &str,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows: Vec<DbTransaction> = sqlx::query_as(
            r#"SELECT t.id, t.card_id, t.amount, t.status, t.timestamp, t.description
               FROM transactions t
               JOIN cards c ON t.card_id = c.id
               WHERE c.card_number = ?
               ORDER BY t.timestamp DESC"#,
        )
        .bind(card_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }
}
