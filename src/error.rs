//! Error handling module
//!
//! Centralized ledger error type and its classification.

use crate::domain::{AccountId, AmountError, TxnId};

/// Ledger-wide Result type
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger error types
///
/// Three families:
/// - client errors: nothing happened, the request must be fixed
/// - conflicts: an idempotency key was reused for a different request
/// - defects: the engine reached a state that correct callers cannot produce
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    // Client errors
    #[error("Account already exists: {0}")]
    AccountExists(AccountId),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Account id must not be empty")]
    InvalidAccountId,

    #[error("Amount must be positive (got {0})")]
    BadAmount(i64),

    #[error("Cannot transfer to the same account: {0}")]
    SameAccount(AccountId),

    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        required: i64,
        available: i64,
    },

    // Conflicts
    #[error("Idempotency conflict: key {key} already produced transaction {original} for a different request")]
    IdempotencyConflict { key: String, original: TxnId },

    // Defects
    #[error("Unbalanced postings (sum = {sum})")]
    UnbalancedPostings { sum: i128 },

    #[error("Transaction has no postings")]
    EmptyTransaction,

    #[error("Balance overflow on account {0}")]
    BalanceOverflow(AccountId),

    #[error("Ledger lock poisoned")]
    LockPoisoned,

    #[error("Ledger invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    /// Check if this is a client error (caller's input was rejected)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::AccountExists(_)
                | Self::AccountNotFound(_)
                | Self::InvalidAccountId
                | Self::BadAmount(_)
                | Self::SameAccount(_)
                | Self::InsufficientFunds { .. }
        )
    }

    /// Check if this is an idempotency conflict
    pub fn is_conflict_error(&self) -> bool {
        matches!(self, Self::IdempotencyConflict { .. })
    }

    /// Check if this signals a defect in the engine or its caller
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedPostings { .. }
                | Self::EmptyTransaction
                | Self::BalanceOverflow(_)
                | Self::LockPoisoned
                | Self::InvariantViolation(_)
                | Self::Serialization(_)
        )
    }
}

impl From<AmountError> for LedgerError {
    fn from(err: AmountError) -> Self {
        match err {
            AmountError::NotPositive(value) => LedgerError::BadAmount(value),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
