//! Card domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use crate::error::DomainError;

/// Unique identifier for a Card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    /// Creates a new random CardId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a CardId from an existing UUID.
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

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CardId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A stored payment card with a debitable balance.
///
/// The card number is the external lookup key and is unique across all
/// cards; the store enforces that invariant. The balance is mutated only
/// through the ledger's atomic payment/refund operations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Card {
    /// Unique identifier
    pub id: CardId,
    /// Card number (digit string, unique)
    pub card_number: String,
    /// Name of the cardholder
    pub cardholder_name: String,
    /// Date after which the card is no longer usable
    pub expiration_date: NaiveDate,
    /// 3 or 4-digit verification code
    pub cvv: String,
    /// Current balance
    pub balance: Money,
}

impl Card {
    /// Creates a new card, validating the field formats.
    ///
    /// # Validation
    /// - Card number must be 12 to 19 digits
    /// - Cardholder name cannot be empty
    /// - CVV must be 3 or 4 digits
    ///
    /// Expiry is not checked here: the create-card boundary rejects past
    /// dates, while fixture seeding deliberately inserts expired cards.
    pub fn new(
        card_number: String,
        cardholder_name: String,
        expiration_date: NaiveDate,
        cvv: String,
        balance: Money,
    ) -> Result<Self, DomainError> {
        if !is_digits(&card_number) || !(12..=19).contains(&card_number.len()) {
            return Err(DomainError::ValidationError(
                "Card number must be 12 to 19 digits".into(),
            ));
        }

        if cardholder_name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Cardholder name is required".into(),
            ));
        }

        if !is_digits(&cvv) || !(3..=4).contains(&cvv.len()) {
            return Err(DomainError::ValidationError(
                "CVV must be 3 or 4 digits".into(),
            ));
        }

        Ok(Self {
            id: CardId::new(),
            card_number,
            cardholder_name,
            expiration_date,
            cvv,
            balance,
        })
    }

    /// Creates a card with all fields specified, without validation
    /// (for database reconstruction and fixture seeding).
    pub fn from_parts(
        id: CardId,
        card_number: String,
        cardholder_name: String,
        expiration_date: NaiveDate,
        cvv: String,
        balance: Money,
    ) -> Self {
        Self {
            id,
            card_number,
            cardholder_name,
            expiration_date,
            cvv,
            balance,
        }
    }

    /// Returns true if the card can no longer be charged.
    ///
    /// A card expires at the start of its expiration date: it is usable
    /// only while "today" is strictly before that date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date <= today
    }

    /// Credits (adds) money to the card balance.
    pub fn credit(&mut self, amount: Money) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Debits (subtracts) money from the card balance.
    pub fn debit(&mut self, amount: Money) -> Result<(), DomainError> {
        self.balance = self.balance.checked_sub(amount)?;
        Ok(())
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
