//! # CardPay Repo
//!
//! Concrete store implementations (adapters) for the card-pay simulator.
//! This crate provides adapters that implement the `CardStore` and
//! `TransactionLedger` ports:
//!
//! - [`SqliteStore`] - sqlx-backed persistence (feature `sqlite`)
//! - [`MemoryStore`] - zero-setup in-process storage

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
mod types;


pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Build and initialize a SQLite store from a database URL.
///
/// This function:
/// 1. Connects to the database
/// 2. Runs the migration to create tables
/// 3. Returns a ready-to-use [`SqliteStore`]
///
/// # Examples
///
/// ```ignore
/// let store = build_store("sqlite://cardpay.db?mode=rwc").await?;
/// ```
#[cfg(feature = "sqlite")]
pub async fn build_store(database_url: &str) -> anyhow::Result<SqliteStore> {
    SqliteStore::new(database_url).await
}
