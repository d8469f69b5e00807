//! walletLedger - demo walkthrough
//!
//! Opens two wallets, funds one from the system account (including an
//! idempotent replay), moves money both ways and prints the reports.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_ledger::{Config, Ledger, LogFormat};

/// Initialize tracing/logging
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wallet_ledger=debug".into());

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(environment = %config.environment, "Starting wallet ledger demo");

    let ledger = Ledger::with_config(&config);

    ledger.create_account("alice")?;
    ledger.create_account("bob")?;

    // Fund Alice from the system account
    let t1 = ledger.add_money("alice", 10_000, "Initial top-up", Some("idem-1"))?;
    println!("Topup txn: {}", t1);

    // Re-using the same idempotency key returns the same txn id
    let t1b = ledger.add_money("alice", 10_000, "Initial top-up duplicate", Some("idem-1"))?;
    println!("Topup idem replay txn: {}", t1b);

    let t3 = ledger.add_money("alice", 10_000, "Second top-up", Some("idem-3"))?;
    println!("Topup txn: {}", t3);

    let t2 = ledger.transfer("alice", "bob", 3_000, "Lunch split", Some("idem-2"))?;
    println!("Transfer txn: {}", t2);

    let t4 = ledger.transfer("bob", "alice", 1_000, "Taxi fare", Some("idem-4"))?;
    println!("Transfer txn: {}", t4);

    println!("Alice balance: {} paise", ledger.get_balance("alice")?);
    println!("Bob   balance: {} paise", ledger.get_balance("bob")?);

    ledger.print_user_transactions("alice")?;
    ledger.print_user_transactions("bob")?;
    ledger.print_all_transactions()?;

    ledger.verify_invariants()?;
    tracing::info!("Ledger invariants hold. Goodbye!");

    Ok(())
}
