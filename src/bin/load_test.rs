//! Load Testing Tool
//!
//! Run with: cargo run --bin load_test --release -- --threads 8 --ops 10000
//!
//! Every worker fires random transfers between a small set of accounts and
//! re-sends a share of them with the same idempotency key. At the end the
//! ledger invariants are verified.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rand::Rng;

use wallet_ledger::{Config, Ledger, LedgerError};

fn arg(args: &[String], name: &str, default: u64) -> u64 {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let threads = arg(&args, "--threads", 8);
    let ops = arg(&args, "--ops", 10_000);
    let account_count = arg(&args, "--accounts", 16).max(2);

    let config = Config::from_env()?;
    let ledger = Ledger::with_config(&config);

    let accounts: Vec<String> = (0..account_count).map(|i| format!("acct-{i}")).collect();
    for account in &accounts {
        ledger.create_account(account.as_str())?;
        ledger.add_money(account, 1_000_000, "seed", None)?;
    }

    println!("Load Test - {} threads x {} transfers over {} accounts", threads, ops, account_count);

    let committed = AtomicU64::new(0);
    let replayed = AtomicU64::new(0);
    let rejected = AtomicU64::new(0);
    let start = Instant::now();

    std::thread::scope(|scope| -> anyhow::Result<()> {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                let (ledger, accounts) = (&ledger, &accounts);
                let (committed, replayed, rejected) = (&committed, &replayed, &rejected);

                scope.spawn(move || -> Result<(), LedgerError> {
                    let mut rng = rand::thread_rng();
                    for op in 0..ops {
                        let from = &accounts[rng.gen_range(0..accounts.len())];
                        let to = &accounts[rng.gen_range(0..accounts.len())];
                        let amount = rng.gen_range(1..5_000);
                        let key = format!("w{worker}-op{op}");

                        let attempts = if rng.gen_bool(0.1) { 2 } else { 1 };
                        let mut done = false;
                        for _ in 0..attempts {
                            match ledger.transfer(from, to, amount, "load", Some(key.as_str())) {
                                Ok(_) if done => {
                                    replayed.fetch_add(1, Ordering::Relaxed);
                                }
                                Ok(_) => {
                                    done = true;
                                    committed.fetch_add(1, Ordering::Relaxed);
                                }
                                Err(LedgerError::InsufficientFunds { .. } | LedgerError::SameAccount(_)) => {
                                    rejected.fetch_add(1, Ordering::Relaxed);
                                }
                                Err(e) => return Err(e),
                            }
                        }
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("load worker panicked"))??;
        }
        Ok(())
    })?;

    let elapsed = start.elapsed();
    let total = committed.load(Ordering::Relaxed);
    let rate = total as f64 / elapsed.as_secs_f64();

    ledger.verify_invariants()?;

    println!("\n=== Load Test Results ===");
    println!("Committed: {}", total);
    println!("Replayed: {}", replayed.load(Ordering::Relaxed));
    println!("Rejected: {}", rejected.load(Ordering::Relaxed));
    println!("Log size: {}", ledger.transaction_count()?);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} transfers/sec", rate);
    println!("Invariants: OK");

    Ok(())
}
