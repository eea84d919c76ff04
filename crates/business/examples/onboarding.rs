//! # Example: Customer Onboarding
//!
//! Walks one customer through the ledger:
//! 1. Onboard (user + address + customer + savings account)
//! 2. Deposit, a refused over-withdrawal, a withdrawal
//! 3. Statement and transaction report
//! 4. Closure resolved from the national id
//!
//! Run with: `cargo run -p tellerbank-business --example onboarding -- --db data/demo.db`

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tellerbank_business::{
    AccountClosure, AccountFactory, BankError, Ledger, Reporting, ServiceContext,
};
use tellerbank_core::{AccountDetails, Address, Credential, UserProfile};
use tellerbank_persistence::{BankConfig, StoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tellerbank onboarding demo
#[derive(Parser)]
#[command(name = "onboarding")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database file path (overrides the configured URL)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Customer credential used throughout the demo
    #[arg(long, default_value = "demo-secret")]
    secret: String,
}

fn store_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => BankConfig::load_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
            .store,
        None => StoreConfig::default(),
    };

    if let Some(db) = &cli.db {
        config = StoreConfig {
            database_url: StoreConfig::for_path(db).database_url,
            ..config
        };
    }

    if let Some(path) = config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = PathBuf::from(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tellerbank_business=info,tellerbank_persistence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = store_config(&cli)?;
    let ctx = ServiceContext::connect(&config)
        .await
        .context("Failed to open store")?;

    println!("=== Tellerbank: Customer Onboarding ===\n");

    // A fresh national id per run keeps the demo repeatable on one database.
    let national_id = format!("{:011}", Utc::now().timestamp_millis() % 100_000_000_000);
    let credential = Credential::new(cli.secret.as_str());
    let profile = UserProfile::new("Alice Premium", &national_id, credential.clone())
        .with_birth_date(NaiveDate::from_ymd_opt(1988, 3, 14).context("invalid date")?)
        .with_phone("11 98888-7777")
        .with_address(Address {
            zip_code: Some("01310-100".to_string()),
            street: Some("Av. Paulista".to_string()),
            house_number: Some("1578".to_string()),
            neighborhood: Some("Bela Vista".to_string()),
            city: Some("São Paulo".to_string()),
            state: Some("SP".to_string()),
        });

    let onboarding = AccountFactory::new(&ctx)
        .onboard(&profile, "0001", &AccountDetails::savings(dec!(0.005)))
        .await?;
    let account = onboarding.account;
    println!("Opened savings account {} for {}", account.number, national_id);

    let ledger = Ledger::new(&ctx);
    let balance = ledger.deposit(account.id, dec!(100.00)).await?;
    println!("Deposited 100.00 -> balance {balance}");

    match ledger.withdraw(account.id, dec!(150.00), &credential).await {
        Err(BankError::InsufficientFunds {
            requested,
            available,
        }) => println!("Withdrawal of {requested} refused, only {available} available"),
        other => anyhow::bail!("expected a refused withdrawal, got {other:?}"),
    }

    let balance = ledger.withdraw(account.id, dec!(40.00), &credential).await?;
    println!("Withdrew 40.00 -> balance {balance}\n");

    println!("Statement:");
    for entry in ledger.get_statement(account.id, &credential).await? {
        println!(
            "  {}  {:<10} {:>10}",
            entry.timestamp,
            entry.kind.as_str(),
            entry.amount.to_string()
        );
    }

    let report = Reporting::new(&ctx).list_all_transactions().await?;
    println!("\nTransactions in store: {}", report.len());

    let closure = AccountClosure::new(&ctx);
    let target = closure.resolve_closure_target(&national_id).await?;
    let closed = closure.close_account(target.account_number).await?;
    println!("Closed account {}: {closed}", target.account_number);

    ctx.store().close().await;
    Ok(())
}
