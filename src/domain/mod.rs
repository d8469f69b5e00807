//! Domain module
//!
//! Core domain types: amounts, accounts, postings and ledger entries.

pub mod account;
pub mod amount;
pub mod entry;

pub use account::{Account, AccountId, AccountKind, DEFAULT_SYSTEM_ACCOUNT};
pub use amount::{Amount, AmountError, Balance};
pub use entry::{postings_sum, LedgerEntry, Posting, TxnId};
