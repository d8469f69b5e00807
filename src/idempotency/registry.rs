//! Idempotency Registry
//!
//! In-memory map from idempotency key to the transaction it produced.
//!
//! Replay policy: every record keeps a SHA-256 fingerprint of the postings
//! that produced it. A replay with identical postings returns the original
//! transaction id; a replay with different postings is rejected with
//! `LedgerError::IdempotencyConflict`. Descriptions are not fingerprinted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{Posting, TxnId};
use crate::error::LedgerError;

/// Stored idempotency key information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyRecord {
    pub key: String,
    pub request_hash: String,
    pub txn_id: TxnId,
    pub created_at: DateTime<Utc>,
}

/// Treat an empty key the same as no key.
pub fn normalize_key(key: Option<&str>) -> Option<&str> {
    key.filter(|k| !k.is_empty())
}

/// Registry of committed idempotency keys. Records are permanent.
#[derive(Debug, Default)]
pub struct IdempotencyRegistry {
    records: HashMap<String, IdempotencyRecord>,
}

impl IdempotencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an existing record
    pub fn get(&self, key: &str) -> Option<&IdempotencyRecord> {
        self.records.get(key)
    }

    /// Look up a key for replay.
    ///
    /// Returns `Ok(None)` if the key has never been committed,
    /// `Ok(Some(id))` if it was committed with the same request, and
    /// `Err(IdempotencyConflict)` if it was committed with different postings.
    pub fn check_replay(
        &self,
        key: &str,
        request_hash: &str,
    ) -> Result<Option<TxnId>, LedgerError> {
        match self.records.get(key) {
            None => Ok(None),
            Some(existing) if existing.request_hash == request_hash => Ok(Some(existing.txn_id)),
            Some(existing) => Err(LedgerError::IdempotencyConflict {
                key: key.to_string(),
                original: existing.txn_id,
            }),
        }
    }

    /// Record a key after its transaction committed
    pub(crate) fn record(
        &mut self,
        key: &str,
        request_hash: String,
        txn_id: TxnId,
        created_at: DateTime<Utc>,
    ) {
        self.records.insert(
            key.to_string(),
            IdempotencyRecord {
                key: key.to_string(),
                request_hash,
                txn_id,
                created_at,
            },
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdempotencyRecord> {
        self.records.values()
    }

    /// Compute SHA-256 fingerprint of a posting list for conflict detection
    pub fn compute_request_hash(postings: &[Posting]) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        for posting in postings {
            let account = posting.account.as_str().as_bytes();
            // Length prefix keeps ("ab", "c") and ("a", "bc") apart.
            hasher.update((account.len() as u64).to_le_bytes());
            hasher.update(account);
            hasher.update(posting.amount.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
