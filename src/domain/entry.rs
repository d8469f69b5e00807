//! Ledger entries
//!
//! Postings and the immutable transaction records built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccountId, Amount};

/// Transaction identifier, assigned at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnId(u64);

impl TxnId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single debit or credit.
///
/// Convention: credit > 0, debit < 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account: AccountId,
    pub amount: i64,
}

impl Posting {
    pub fn new(account: impl Into<AccountId>, amount: i64) -> Self {
        Self {
            account: account.into(),
            amount,
        }
    }

    pub fn credit(account: impl Into<AccountId>, amount: Amount) -> Self {
        Self::new(account, amount.as_credit())
    }

    pub fn debit(account: impl Into<AccountId>, amount: Amount) -> Self {
        Self::new(account, amount.as_debit())
    }
}

/// Sum of posting amounts, widened so the check itself cannot overflow.
pub fn postings_sum(postings: &[Posting]) -> i128 {
    postings.iter().map(|p| i128::from(p.amount)).sum()
}

/// Committed ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: TxnId,
    pub at: DateTime<Utc>,
    pub description: String,
    pub postings: Vec<Posting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl LedgerEntry {
    pub fn is_balanced(&self) -> bool {
        postings_sum(&self.postings) == 0
    }

    pub fn touches(&self, account: &str) -> bool {
        self.postings.iter().any(|p| p.account.as_str() == account)
    }

    /// Net effect of this entry on one account.
    ///
    /// Widened like `postings_sum`: legs on one account may overflow `i64`
    /// when added from zero even though the running balance never does.
    pub fn net_for(&self, account: &str) -> i128 {
        self.postings
            .iter()
            .filter(|p| p.account.as_str() == account)
            .map(|p| i128::from(p.amount))
            .sum()
    }

    /// Distinct accounts in posting order
    pub fn accounts(&self) -> Vec<&AccountId> {
        let mut seen: Vec<&AccountId> = Vec::with_capacity(self.postings.len());
        for posting in &self.postings {
            if !seen.contains(&&posting.account) {
                seen.push(&posting.account);
            }
        }
        seen
    }
}
