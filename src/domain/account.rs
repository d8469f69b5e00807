//! Account types
//!
//! Identifiers and per-account state held by the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::Balance;

/// Default identifier of the system equity account
pub const DEFAULT_SYSTEM_ACCOUNT: &str = "=SYSTEM=";

/// Opaque identifier naming a ledger participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `AccountId` be queried with a plain `&str`.
impl Borrow<str> for AccountId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Account kind
///
/// Only `SystemEquity` may carry a negative balance: it represents value that
/// entered the ledger from outside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Regular,
    SystemEquity,
}

impl AccountKind {
    pub fn allows_negative_balance(&self) -> bool {
        matches!(self, AccountKind::SystemEquity)
    }
}

/// A registered account and its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    kind: AccountKind,
    balance: Balance,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Open a regular account with zero balance
    pub fn open(id: AccountId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: AccountKind::Regular,
            balance: Balance::zero(),
            created_at,
        }
    }

    /// Open the system equity account
    pub fn system(id: AccountId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: AccountKind::SystemEquity,
            balance: Balance::zero(),
            created_at,
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn is_system(&self) -> bool {
        self.kind == AccountKind::SystemEquity
    }

    pub(crate) fn set_balance(&mut self, balance: Balance) {
        self.balance = balance;
    }
}
