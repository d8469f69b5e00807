//! Console reports
//!
//! Read-only renderings of the global log and of one account's history,
//! newest first.

use std::fmt;

use crate::domain::{AccountId, LedgerEntry};
use crate::error::LedgerResult;

use super::Ledger;

const RULE: &str = "---------------------------------";
const FOOTER: &str = "=================================";

/// Printable view over a set of committed entries.
///
/// With a focus account, only that account's postings are shown with their
/// direction, followed by the counterparties.
#[derive(Debug, Clone)]
pub struct LedgerReport {
    focus: Option<AccountId>,
    entries: Vec<LedgerEntry>,
}

impl LedgerReport {
    pub fn global(entries: Vec<LedgerEntry>) -> Self {
        Self {
            focus: None,
            entries,
        }
    }

    pub fn for_account(account: AccountId, entries: Vec<LedgerEntry>) -> Self {
        Self {
            focus: Some(account),
            entries,
        }
    }

    fn write_entry(&self, f: &mut fmt::Formatter<'_>, entry: &LedgerEntry) -> fmt::Result {
        writeln!(
            f,
            "TxnID: {} | {} | {}",
            entry.id,
            entry.at.to_rfc3339(),
            entry.description
        )?;

        match &self.focus {
            None => {
                for posting in &entry.postings {
                    writeln!(f, "   {:<8} {:+}", posting.account, posting.amount)?;
                }
            }
            Some(focus) => {
                let own = entry.net_for(focus.as_str());
                writeln!(f, "   {:<8} {:+}", focus, own)?;
                for posting in entry.postings.iter().filter(|p| &p.account != focus) {
                    let role = if posting.amount < 0 { "from" } else { "to" };
                    writeln!(f, "   {:<4} {:<8} {:+}", role, posting.account, posting.amount)?;
                }
            }
        }

        writeln!(f, "{}", RULE)
    }
}

impl fmt::Display for LedgerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return match &self.focus {
                None => writeln!(f, "No transactions yet."),
                Some(focus) => writeln!(f, "No transactions found for account '{focus}'."),
            };
        }

        match &self.focus {
            None => writeln!(f, "========= GLOBAL LEDGER =========")?,
            Some(focus) => writeln!(f, "========= TRANSACTIONS for {focus} =========")?,
        }

        for entry in self.entries.iter().rev() {
            self.write_entry(f, entry)?;
        }

        writeln!(f, "{}", FOOTER)
    }
}

impl Ledger {
    /// Render the whole log, newest first
    pub fn render_all_transactions(&self) -> LedgerResult<String> {
        Ok(LedgerReport::global(self.all_transactions()?).to_string())
    }

    /// Render one account's history, newest first
    pub fn render_user_transactions(&self, id: impl AsRef<str>) -> LedgerResult<String> {
        let id = id.as_ref();
        let entries = self.list_transactions(id)?;
        Ok(LedgerReport::for_account(AccountId::from(id), entries).to_string())
    }

    /// Print the whole log to stdout
    pub fn print_all_transactions(&self) -> LedgerResult<()> {
        print!("{}", self.render_all_transactions()?);
        Ok(())
    }

    /// Print one account's history to stdout
    pub fn print_user_transactions(&self, id: impl AsRef<str>) -> LedgerResult<()> {
        print!("{}", self.render_user_transactions(id)?);
        Ok(())
    }
}
