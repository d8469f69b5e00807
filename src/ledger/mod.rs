//! Ledger Engine
//!
//! Owns all balances, the transaction log, the per-account index and the
//! idempotency registry behind one `RwLock`. Reads share the lock; every
//! commit holds it exclusively, so checks and mutations of one transaction are
//! never interleaved with another.

mod invariants;
mod report;
mod store;

pub use report::LedgerReport;
pub use store::LedgerStore;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::domain::{
    postings_sum, Account, AccountId, Amount, LedgerEntry, Posting, TxnId, DEFAULT_SYSTEM_ACCOUNT,
};
use crate::error::{LedgerError, LedgerResult};
use crate::idempotency::{normalize_key, IdempotencyRegistry};

/// In-memory double-entry ledger
///
/// # Example
/// ```
/// use wallet_ledger::Ledger;
///
/// let ledger = Ledger::new();
/// ledger.create_account("alice").unwrap();
/// ledger.create_account("bob").unwrap();
///
/// ledger.add_money("alice", 10_000, "Initial top-up", Some("idem-1")).unwrap();
/// ledger.transfer("alice", "bob", 3_000, "Lunch split", Some("idem-2")).unwrap();
///
/// assert_eq!(ledger.get_balance("alice").unwrap(), 7_000);
/// assert_eq!(ledger.get_balance("bob").unwrap(), 3_000);
/// ```
#[derive(Debug)]
pub struct Ledger {
    store: RwLock<LedgerStore>,
    system: AccountId,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// Create a ledger with the default system account and the wall clock
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_SYSTEM_ACCOUNT, Arc::new(SystemClock))
    }

    /// Create a ledger from configuration
    pub fn with_config(config: &Config) -> Self {
        Self::with_clock(config.system_account.as_str(), Arc::new(SystemClock))
    }

    /// Create a ledger with an explicit system account id and clock.
    ///
    /// A blank id is not a usable account; it falls back to
    /// `DEFAULT_SYSTEM_ACCOUNT`, matching what `Config` accepts.
    pub fn with_clock(system_account: impl Into<AccountId>, clock: Arc<dyn Clock>) -> Self {
        let mut system = system_account.into();
        if system.as_str().trim().is_empty() {
            tracing::warn!(
                default = DEFAULT_SYSTEM_ACCOUNT,
                "Blank system account id, using the default"
            );
            system = AccountId::from(DEFAULT_SYSTEM_ACCOUNT);
        }
        let store = LedgerStore::new(system.clone(), clock.now());
        tracing::debug!(system_account = %system, "Ledger created");

        Self {
            store: RwLock::new(store),
            system,
            clock,
        }
    }

    /// The system equity account, the only account allowed a negative balance
    pub fn system_account(&self) -> &AccountId {
        &self.system
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerStore>> {
        self.store.read().map_err(|_| {
            tracing::error!("Ledger lock poisoned on read");
            LedgerError::LockPoisoned
        })
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerStore>> {
        self.store.write().map_err(|_| {
            tracing::error!("Ledger lock poisoned on write");
            LedgerError::LockPoisoned
        })
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Register a new account with zero balance
    pub fn create_account(&self, id: impl Into<AccountId>) -> LedgerResult<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(LedgerError::InvalidAccountId);
        }

        let mut store = self.write()?;
        store.insert_account(Account::open(id.clone(), self.clock.now()))?;
        tracing::info!(account = %id, "Account created");
        Ok(())
    }

    /// Current balance of an account
    pub fn get_balance(&self, id: impl AsRef<str>) -> LedgerResult<i64> {
        let store = self.read()?;
        Ok(store.require_account(id.as_ref())?.balance().value())
    }

    /// Registered accounts (system account included), ordered by id
    pub fn accounts(&self) -> LedgerResult<Vec<Account>> {
        let store = self.read()?;
        let mut accounts: Vec<Account> = store.accounts().cloned().collect();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(accounts)
    }

    // =========================================================================
    // Money movement
    // =========================================================================

    /// Mint `amount` into `to` from the system equity account
    pub fn add_money(
        &self,
        to: impl AsRef<str>,
        amount: i64,
        description: &str,
        idempotency_key: Option<&str>,
    ) -> LedgerResult<TxnId> {
        let to = to.as_ref();
        let amount = Amount::new(amount)?;
        if to == self.system.as_str() {
            return Err(LedgerError::SameAccount(self.system.clone()));
        }

        let postings = vec![
            Posting::debit(self.system.clone(), amount),
            Posting::credit(to, amount),
        ];

        self.apply(postings, description, idempotency_key, |store| {
            store.require_account(to).map(|_| ())
        })
    }

    /// Move `amount` from one account to another
    pub fn transfer(
        &self,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        amount: i64,
        description: &str,
        idempotency_key: Option<&str>,
    ) -> LedgerResult<TxnId> {
        let (from, to) = (from.as_ref(), to.as_ref());
        let amount = Amount::new(amount)?;
        if from == to {
            return Err(LedgerError::SameAccount(AccountId::from(from)));
        }

        let postings = vec![Posting::debit(from, amount), Posting::credit(to, amount)];

        self.apply(postings, description, idempotency_key, |store| {
            let source = store.require_account(from)?;
            store.require_account(to)?;
            if !source.balance().is_sufficient_for(&amount) {
                return Err(LedgerError::InsufficientFunds {
                    account: source.id().clone(),
                    required: amount.value(),
                    available: source.balance().value(),
                });
            }
            Ok(())
        })
    }

    /// Commit an arbitrary balanced transaction with no extra precheck
    pub fn post(
        &self,
        postings: Vec<Posting>,
        description: &str,
        idempotency_key: Option<&str>,
    ) -> LedgerResult<TxnId> {
        self.apply(postings, description, idempotency_key, |_| Ok(()))
    }

    /// The single commit path.
    ///
    /// 1. Rejects empty or unbalanced postings as defects.
    /// 2. Under the write lock, replays a known idempotency key (or reports a
    ///    conflict if the postings differ).
    /// 3. Runs `precheck` against the current state.
    /// 4. Applies balances, appends the entry, indexes it and records the key.
    ///
    /// Steps 2 to 4 run under one exclusive lock acquisition. Nothing is
    /// written unless every step succeeds, and a failed request never records
    /// its idempotency key.
    pub fn apply<F>(
        &self,
        postings: Vec<Posting>,
        description: &str,
        idempotency_key: Option<&str>,
        precheck: F,
    ) -> LedgerResult<TxnId>
    where
        F: FnOnce(&LedgerStore) -> LedgerResult<()>,
    {
        if postings.is_empty() {
            tracing::error!(description, "Rejected transaction without postings");
            return Err(LedgerError::EmptyTransaction);
        }

        let sum = postings_sum(&postings);
        if sum != 0 {
            tracing::error!(
                sum = %sum,
                description,
                postings = ?postings,
                "Rejected unbalanced postings"
            );
            return Err(LedgerError::UnbalancedPostings { sum });
        }

        let key = normalize_key(idempotency_key);
        let request_hash = key.map(|_| IdempotencyRegistry::compute_request_hash(&postings));

        let mut store = self.write()?;

        if let (Some(key), Some(hash)) = (key, request_hash.as_deref()) {
            match store.idempotency().check_replay(key, hash) {
                Ok(Some(prior)) => {
                    tracing::info!(key, txn_id = %prior, "Idempotent replay");
                    return Ok(prior);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(key, error = %err, "Idempotency key reused with different postings");
                    return Err(err);
                }
            }
        }

        precheck(&*store)?;

        let at = self.clock.now();
        let posting_count = postings.len();
        let id = store.commit(postings, description, key.zip(request_hash), at)?;

        tracing::debug!(
            txn_id = %id,
            postings = posting_count,
            description,
            "Transaction committed"
        );

        Ok(id)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Entries touching an account, in commit order
    pub fn list_transactions(&self, id: impl AsRef<str>) -> LedgerResult<Vec<LedgerEntry>> {
        let id = id.as_ref();
        let store = self.read()?;
        store.require_account(id)?;

        Ok(store
            .index(id)
            .iter()
            .filter_map(|txn_id| store.entry(*txn_id).cloned())
            .collect())
    }

    /// The whole log, in commit order
    pub fn all_transactions(&self) -> LedgerResult<Vec<LedgerEntry>> {
        let store = self.read()?;
        Ok(store.entries().cloned().collect())
    }

    /// Look up one committed entry
    pub fn transaction(&self, id: TxnId) -> LedgerResult<Option<LedgerEntry>> {
        let store = self.read()?;
        Ok(store.entry(id).cloned())
    }

    pub fn transaction_count(&self) -> LedgerResult<usize> {
        Ok(self.read()?.entry_count())
    }

    /// JSON dump of the log for presentation layers
    pub fn export_json(&self) -> LedgerResult<String> {
        let entries = self.all_transactions()?;
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    /// Check conservation, balance/history agreement, non-negative regular
    /// balances, index completeness and id monotonicity on one snapshot.
    pub fn verify_invariants(&self) -> LedgerResult<()> {
        let store = self.read()?;
        invariants::check(&store).map_err(|violation| {
            tracing::error!(violation = %violation, "Ledger invariant violated");
            LedgerError::InvariantViolation(violation)
        })
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
