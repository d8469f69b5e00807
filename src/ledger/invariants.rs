//! Ledger invariant checks, run against one consistent store snapshot.

use std::collections::HashMap;

use crate::domain::TxnId;

use super::LedgerStore;

/// Returns a description of the first violated invariant, if any.
pub(crate) fn check(store: &LedgerStore) -> Result<(), String> {
    let mut replayed: HashMap<&str, i128> = HashMap::new();
    let mut expected_id = 1u64;

    for entry in store.entries() {
        if entry.id != TxnId::new(expected_id) {
            return Err(format!(
                "transaction ids not contiguous: expected {}, found {}",
                expected_id, entry.id
            ));
        }
        expected_id += 1;

        if !entry.is_balanced() {
            return Err(format!("transaction {} does not sum to zero", entry.id));
        }

        for posting in &entry.postings {
            if !store.has_account(posting.account.as_str()) {
                return Err(format!(
                    "transaction {} references unknown account {}",
                    entry.id, posting.account
                ));
            }
            *replayed.entry(posting.account.as_str()).or_default() += i128::from(posting.amount);
        }

        for account in entry.accounts() {
            let hits = store
                .index(account.as_str())
                .iter()
                .filter(|id| **id == entry.id)
                .count();
            if hits != 1 {
                return Err(format!(
                    "transaction {} indexed {} times for account {}",
                    entry.id, hits, account
                ));
            }
        }
    }

    if store.last_txn_id().map_or(0, |id| id.value()) != expected_id - 1 {
        return Err("id counter does not match the committed log".to_string());
    }

    let total: i128 = store
        .accounts()
        .map(|account| i128::from(account.balance().value()))
        .sum();
    if total != 0 {
        return Err(format!("balances sum to {} instead of zero", total));
    }

    for account in store.accounts() {
        let id = account.id().as_str();
        let balance = account.balance().value();

        let history = replayed.get(id).copied().unwrap_or(0);
        if history != i128::from(balance) {
            return Err(format!(
                "account {} balance {} differs from history {}",
                id, balance, history
            ));
        }

        if balance < 0 && !account.kind().allows_negative_balance() {
            return Err(format!("regular account {} is negative ({})", id, balance));
        }

        let index = store.index(id);
        if index.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!("index for account {} is not strictly increasing", id));
        }
        for txn_id in index {
            match store.entry(*txn_id) {
                Some(entry) if entry.touches(id) => {}
                _ => {
                    return Err(format!(
                        "index for account {} lists transaction {} that does not touch it",
                        id, txn_id
                    ))
                }
            }
        }
    }

    for record in store.idempotency().iter() {
        match store.entry(record.txn_id) {
            Some(entry) if entry.idempotency_key.as_deref() == Some(record.key.as_str()) => {}
            _ => {
                return Err(format!(
                    "idempotency key {} points at transaction {} which does not carry it",
                    record.key, record.txn_id
                ))
            }
        }
    }

    Ok(())
}
