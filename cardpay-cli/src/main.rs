//! CardPay CLI
//!
//! Command-line interface for the card-pay API.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use cardpay_client::CardPayClient;
use cardpay_types::{CreateCardRequest, TransactionId};

#[derive(Parser)]
#[command(name = "cardpay")]
#[command(author, version, about = "Card-pay simulator CLI client", long_about = None)]
struct Cli {
    /// Base URL of the card-pay API
    #[arg(long, env = "CARDPAY_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Card operations
    Card {
        #[command(subcommand)]
        action: CardCommands,
    },
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Transaction queries
    Transaction {
        #[command(subcommand)]
        action: TransactionCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum CardCommands {
    /// Create a new card
    Create {
        /// Card number (digit string)
        number: String,
        /// Cardholder name
        #[arg(long)]
        holder: String,
        /// Expiration date (YYYY-MM-DD)
        #[arg(long)]
        expires: NaiveDate,
        /// CVV code
        #[arg(long)]
        cvv: String,
        /// Opening balance
        #[arg(long, default_value = "0.00")]
        balance: Decimal,
    },
    /// Get card details
    Get {
        /// Card number
        number: String,
    },
    /// List all cards
    List,
    /// Delete all cards
    Clear,
    /// Seed the standard valid test cards
    Initialize,
    /// Seed the scenario test cards
    InitScenarios,
    /// Show test scenario information
    Scenarios,
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Process a payment
    Process {
        #[arg(long)]
        card: String,
        #[arg(long)]
        cvv: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        description: Option<String>,
    },
    /// Refund an approved transaction
    Refund {
        /// Transaction ID (UUID)
        id: String,
    },
    /// Get the status of a transaction
    Status {
        /// Transaction ID (UUID)
        id: String,
    },
}

#[derive(Subcommand)]
enum TransactionCommands {
    /// List all transactions
    List,
    /// Get transaction details
    Get {
        /// Transaction ID (UUID)
        id: String,
    },
    /// List transactions for a card
    ForCard {
        /// Card number
        number: String,
    },
}

fn parse_transaction_id(s: &str) -> Result<TransactionId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid transaction ID: {}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = CardPayClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Card { action } => match action {
            CardCommands::Create {
                number,
                holder,
                expires,
                cvv,
                balance,
            } => {
                let card = client
                    .create_card(CreateCardRequest {
                        card_number: number,
                        cardholder_name: holder,
                        expiration_date: expires,
                        cvv,
                        balance,
                    })
                    .await?;
                println!("{}", serde_json::to_string_pretty(&card)?);
            }
            CardCommands::Get { number } => {
                let card = client.get_card(&number).await?;
                println!("{}", serde_json::to_string_pretty(&card)?);
            }
            CardCommands::List => {
                let cards = client.list_cards().await?;
                println!("{}", serde_json::to_string_pretty(&cards)?);
            }
            CardCommands::Clear => {
                let deleted = client.delete_cards().await?;
                println!("✓ Deleted {} cards", deleted);
            }
            CardCommands::Initialize => {
                let cards = client.initialize_cards().await?;
                println!("{}", serde_json::to_string_pretty(&cards)?);
            }
            CardCommands::InitScenarios => {
                let cards = client.initialize_test_scenarios().await?;
                println!("{}", serde_json::to_string_pretty(&cards)?);
            }
            CardCommands::Scenarios => {
                let scenarios = client.test_scenarios().await?;
                println!("{}", serde_json::to_string_pretty(&scenarios)?);
            }
        },

        Commands::Payment { action } => match action {
            PaymentCommands::Process {
                card,
                cvv,
                amount,
                description,
            } => {
                let response = client
                    .process_payment(&card, &cvv, amount, description.as_deref())
                    .await?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            PaymentCommands::Refund { id } => {
                let transaction_id = parse_transaction_id(&id)?;
                let response = client.process_refund(transaction_id).await?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            PaymentCommands::Status { id } => {
                let transaction_id = parse_transaction_id(&id)?;
                let status = client.transaction_status(transaction_id).await?;
                println!("{}", status);
            }
        },

        Commands::Transaction { action } => match action {
            TransactionCommands::List => {
                let transactions = client.list_transactions().await?;
                println!("{}", serde_json::to_string_pretty(&transactions)?);
            }
            TransactionCommands::Get { id } => {
                let transaction_id = parse_transaction_id(&id)?;
                let transaction = client.get_transaction(transaction_id).await?;
                println!("{}", serde_json::to_string_pretty(&transaction)?);
            }
            TransactionCommands::ForCard { number } => {
                let transactions = client.transactions_for_card(&number).await?;
                println!("{}", serde_json::to_string_pretty(&transactions)?);
            }
        },
    }

    Ok(())
}
