//! walletLedger Library
//!
//! In-process double-entry ledger: accounts, balanced multi-posting
//! transactions, idempotent commits and history queries.

pub mod clock;
pub mod config;
pub mod domain;
pub mod idempotency;
pub mod ledger;

mod error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigError, LogFormat};
pub use domain::{Account, AccountId, AccountKind, Amount, AmountError, Balance};
pub use domain::{LedgerEntry, Posting, TxnId};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{Ledger, LedgerReport, LedgerStore};
