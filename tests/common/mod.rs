//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use wallet_ledger::{FixedClock, Ledger, LedgerEntry};

/// Ledger with the given regular accounts registered and a frozen clock
pub fn setup_ledger(accounts: &[&str]) -> Ledger {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let ledger = Ledger::with_clock("=SYSTEM=", Arc::new(FixedClock::new(at)));
    for account in accounts {
        ledger.create_account(*account).expect("Failed to create account");
    }
    ledger
}

/// Sum of every balance, system account included
pub fn total_balance(ledger: &Ledger) -> i128 {
    ledger
        .accounts()
        .unwrap()
        .iter()
        .map(|a| i128::from(a.balance().value()))
        .sum()
}

/// Replay an account's balance from the full log
pub fn replayed_balance(entries: &[LedgerEntry], account: &str) -> i128 {
    entries.iter().map(|e| e.net_for(account)).sum()
}
