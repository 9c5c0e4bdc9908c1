//! Test-card fixtures.
//!
//! Pure data-seeding helpers behind the fixture endpoints; no engine
//! logic lives here. Cards are built with `from_parts` because the
//! scenario set deliberately includes expired cards that the
//! create-card boundary would reject.

use std::collections::BTreeMap;

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use cardpay_types::{Card, CardId, Money};

fn card(number: &str, holder: &str, expiry: NaiveDate, cvv: &str, balance: Decimal) -> Card {
    Card::from_parts(
        CardId::new(),
        number.to_string(),
        holder.to_string(),
        expiry,
        cvv.to_string(),
        Money::new(balance).expect("fixture balances are non-negative"),
    )
}

/// The standard set of valid test cards with different balances.
pub fn valid_cards(today: NaiveDate) -> Vec<Card> {
    vec![
        card(
            "4242424242424242",
            "John Doe",
            today + Months::new(24),
            "123",
            dec!(1000.00),
        ),
        card(
            "5555555555554444",
            "Jane Smith",
            today + Months::new(12),
            "456",
            dec!(500.00),
        ),
        card(
            "378282246310005",
            "Bob Johnson",
            today + Months::new(6),
            "789",
            dec!(2000.00),
        ),
        card(
            "6011111111111117",
            "Alice Brown",
            today + Months::new(36),
            "321",
            dec!(750.00),
        ),
    ]
}

/// Scenario test cards covering approvals, declines and error cases.
pub fn scenario_cards(today: NaiveDate) -> Vec<Card> {
    vec![
        // Always approved cards
        card(
            "4242424242424242",
            "Always Approved",
            today + Months::new(24),
            "123",
            dec!(10000.00),
        ),
        card(
            "5555555555554444",
            "Always Approved",
            today + Months::new(12),
            "456",
            dec!(5000.00),
        ),
        // Always declined cards
        card(
            "4000000000000002",
            "Always Declined",
            today + Months::new(24),
            "789",
            dec!(1000.00),
        ),
        card(
            "4000000000000010",
            "Always Declined",
            today + Months::new(12),
            "321",
            dec!(2000.00),
        ),
        // Error scenario cards
        card(
            "4000000000000341",
            "Processing Error",
            today + Months::new(24),
            "456",
            dec!(3000.00),
        ),
        card(
            "4000000000000119",
            "Processing Error",
            today + Months::new(12),
            "789",
            dec!(4000.00),
        ),
        // Insufficient funds cards
        card(
            "4000000000009995",
            "Insufficient Funds",
            today + Months::new(24),
            "123",
            dec!(10.00),
        ),
        card(
            "4000000000009987",
            "Insufficient Funds",
            today + Months::new(12),
            "456",
            dec!(5.00),
        ),
        // Expired cards
        card(
            "4000000000000069",
            "Expired Card",
            today - Months::new(1),
            "789",
            dec!(1000.00),
        ),
        card(
            "4000000000000127",
            "Expired Card",
            today - Days::new(1),
            "321",
            dec!(2000.00),
        ),
    ]
}

/// One entry in the scenario information map.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScenarioCard {
    /// Card number to use
    #[schema(example = "4242424242424242")]
    pub card_number: String,
    /// What the card does
    pub description: String,
    /// CVV to use
    #[schema(example = "123")]
    pub cvv: String,
    /// Display expiry
    #[schema(example = "12/25")]
    pub expiry: String,
}

fn scenario(number: &str, description: &str, cvv: &str, expiry: &str) -> ScenarioCard {
    ScenarioCard {
        card_number: number.to_string(),
        description: description.to_string(),
        cvv: cvv.to_string(),
        expiry: expiry.to_string(),
    }
}

/// Static description of the available test-card scenarios.
pub fn test_scenarios() -> BTreeMap<&'static str, Vec<ScenarioCard>> {
    BTreeMap::from([
        (
            "always_approved",
            vec![
                scenario(
                    "4242424242424242",
                    "Visa card that will always be approved",
                    "123",
                    "12/25",
                ),
                scenario(
                    "5555555555554444",
                    "Mastercard that will always be approved",
                    "456",
                    "12/25",
                ),
            ],
        ),
        (
            "always_declined",
            vec![
                scenario(
                    "4000000000000002",
                    "Visa card that will always be declined",
                    "789",
                    "12/25",
                ),
                scenario(
                    "4000000000000010",
                    "Visa card that will always be declined",
                    "321",
                    "12/25",
                ),
            ],
        ),
        (
            "processing_error",
            vec![
                scenario(
                    "4000000000000341",
                    "Visa card that will trigger a processing error",
                    "456",
                    "12/25",
                ),
                scenario(
                    "4000000000000119",
                    "Visa card that will trigger a processing error",
                    "789",
                    "12/25",
                ),
            ],
        ),
        (
            "insufficient_funds",
            vec![
                scenario(
                    "4000000000009995",
                    "Visa card that will always have insufficient funds",
                    "123",
                    "12/25",
                ),
                scenario(
                    "4000000000009987",
                    "Visa card that will always have insufficient funds",
                    "456",
                    "12/25",
                ),
            ],
        ),
        (
            "expired_cards",
            vec![
                scenario("4000000000000069", "Visa card that is expired", "789", "01/23"),
                scenario("4000000000000127", "Visa card that is expired", "321", "01/23"),
            ],
        ),
    ])
}
