//! Ledger Store
//!
//! Every piece of mutable engine state lives here: balances, the append-only
//! log, the per-account index, the idempotency registry and the id counter.
//! The engine guards the whole store with a single lock.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::domain::{Account, AccountId, Balance, LedgerEntry, Posting, TxnId};
use crate::error::{LedgerError, LedgerResult};
use crate::idempotency::IdempotencyRegistry;

#[derive(Debug)]
pub struct LedgerStore {
    accounts: HashMap<AccountId, Account>,
    entries: BTreeMap<TxnId, LedgerEntry>,
    by_account: HashMap<AccountId, Vec<TxnId>>,
    idempotency: IdempotencyRegistry,
    last_id: u64,
}

impl LedgerStore {
    /// Create a store holding only the system equity account
    pub(crate) fn new(system: AccountId, created_at: DateTime<Utc>) -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(system.clone(), Account::system(system, created_at));

        Self {
            accounts,
            entries: BTreeMap::new(),
            by_account: HashMap::new(),
            idempotency: IdempotencyRegistry::new(),
            last_id: 0,
        }
    }

    // =========================================================================
    // Read access (available to prechecks)
    // =========================================================================

    pub fn has_account(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    /// Get an account or fail with `AccountNotFound`
    pub fn require_account(&self, id: &str) -> LedgerResult<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| LedgerError::AccountNotFound(AccountId::from(id)))
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Committed entries in commit order
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    pub fn entry(&self, id: TxnId) -> Option<&LedgerEntry> {
        self.entries.get(&id)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Transaction ids touching an account, in commit order
    pub fn index(&self, account: &str) -> &[TxnId] {
        self.by_account
            .get(account)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn idempotency(&self) -> &IdempotencyRegistry {
        &self.idempotency
    }

    pub fn last_txn_id(&self) -> Option<TxnId> {
        (self.last_id > 0).then(|| TxnId::new(self.last_id))
    }

    // =========================================================================
    // Mutation (engine only, under the write lock)
    // =========================================================================

    pub(crate) fn insert_account(&mut self, account: Account) -> LedgerResult<()> {
        if self.accounts.contains_key(account.id().as_str()) {
            return Err(LedgerError::AccountExists(account.id().clone()));
        }
        self.accounts.insert(account.id().clone(), account);
        Ok(())
    }

    /// Apply balanced postings, append the entry, index it and record its key.
    ///
    /// Balance changes are staged and validated before anything is written,
    /// so any error leaves the store untouched.
    pub(crate) fn commit(
        &mut self,
        postings: Vec<Posting>,
        description: &str,
        idempotency: Option<(&str, String)>,
        at: DateTime<Utc>,
    ) -> LedgerResult<TxnId> {
        let staged = self.stage_balances(&postings)?;

        let next_id = self.last_id.checked_add(1).ok_or_else(|| {
            tracing::error!(last_id = self.last_id, "Transaction id space exhausted");
            LedgerError::InvariantViolation("transaction id space exhausted".to_string())
        })?;

        for (account_id, balance) in staged {
            if let Some(account) = self.accounts.get_mut(account_id.as_str()) {
                account.set_balance(balance);
            }
        }

        let id = TxnId::new(next_id);
        self.last_id = next_id;

        let entry = LedgerEntry {
            id,
            at,
            description: description.to_string(),
            postings,
            idempotency_key: idempotency.as_ref().map(|(key, _)| key.to_string()),
        };

        let touched: Vec<AccountId> = entry.accounts().into_iter().cloned().collect();
        for account_id in touched {
            self.by_account.entry(account_id).or_default().push(id);
        }
        self.entries.insert(id, entry);

        if let Some((key, request_hash)) = idempotency {
            self.idempotency.record(key, request_hash, id, at);
        }

        Ok(id)
    }

    /// Compute the resulting balance of every distinct account touched.
    fn stage_balances(&self, postings: &[Posting]) -> LedgerResult<Vec<(AccountId, Balance)>> {
        let mut staged: Vec<(AccountId, Balance)> = Vec::with_capacity(postings.len());

        for posting in postings {
            let account = self.require_account(posting.account.as_str())?;
            let slot = staged.iter().position(|(id, _)| id == &posting.account);
            let current = slot.map_or(account.balance(), |i| staged[i].1);

            let next = current.apply_delta(posting.amount).ok_or_else(|| {
                tracing::error!(
                    account = %posting.account,
                    balance = current.value(),
                    delta = posting.amount,
                    "Balance overflow"
                );
                LedgerError::BalanceOverflow(posting.account.clone())
            })?;

            match slot {
                Some(i) => staged[i].1 = next,
                None => staged.push((posting.account.clone(), next)),
            }
        }

        // Net effect per account decides; a regular account may not end negative.
        for (account_id, balance) in &staged {
            let Some(account) = self.accounts.get(account_id.as_str()) else {
                continue;
            };
            if balance.is_negative() && !account.kind().allows_negative_balance() {
                let available = account.balance().value();
                return Err(LedgerError::InsufficientFunds {
                    account: account_id.clone(),
                    required: available.saturating_sub(balance.value()),
                    available,
                });
            }
        }

        Ok(staged)
    }
}

// Direct writes that bypass `commit`, for exercising the invariant checks.
#[cfg(test)]
impl LedgerStore {
    pub(crate) fn force_balance(&mut self, id: &str, value: i64) {
        if let Some(account) = self.accounts.get_mut(id) {
            account.set_balance(Balance::zero().apply_delta(value).unwrap_or_default());
        }
    }

    /// Append and index an entry without touching balances.
    pub(crate) fn force_entry(&mut self, entry: LedgerEntry) {
        let id = entry.id;
        for account_id in entry.accounts() {
            self.by_account.entry(account_id.clone()).or_default().push(id);
        }
        self.entries.insert(id, entry);
        self.last_id = id.value();
    }

    pub(crate) fn force_index(&mut self, account: &str, id: TxnId) {
        self.by_account.entry(AccountId::from(account)).or_default().push(id);
    }

    pub(crate) fn idempotency_mut(&mut self) -> &mut IdempotencyRegistry {
        &mut self.idempotency
    }
}
