//! Per-user in-memory storage.
//!
//! The store hands out owned snapshots. Callers never hold the lock while
//! aggregating.

use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::{Budget, EngineError, Goal, ResultEngine, Transaction};

/// Inclusive date window. Open ends are unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ResultEngine<Self> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(EngineError::InvalidRange(format!(
                "from {from} is after to {to}"
            )));
        }
        Ok(Self { from, to })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Everything one user owns.
#[derive(Clone, Debug, Default)]
pub struct UserLedger {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
}

/// Users are isolated from each other: every access is keyed by user id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserLedger>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store, e.g. from an import.
    #[must_use]
    pub fn with_ledgers(ledgers: impl IntoIterator<Item = (String, UserLedger)>) -> Self {
        Self {
            users: RwLock::new(ledgers.into_iter().collect()),
        }
    }

    /// Snapshot of the user's transactions, optionally restricted to `range`.
    pub async fn transactions(&self, user_id: &str, range: Option<DateRange>) -> Vec<Transaction> {
        self.read(user_id, |ledger| {
            ledger
                .transactions
                .iter()
                .filter(|tx| range.is_none_or(|range| range.contains(tx.date)))
                .cloned()
                .collect()
        })
        .await
    }

    pub async fn budgets(&self, user_id: &str) -> Vec<Budget> {
        self.read(user_id, |ledger| ledger.budgets.clone()).await
    }

    pub async fn goals(&self, user_id: &str) -> Vec<Goal> {
        self.read(user_id, |ledger| ledger.goals.clone()).await
    }

    pub(crate) async fn read<T>(&self, user_id: &str, f: impl FnOnce(&UserLedger) -> T) -> T {
        let users = self.users.read().await;
        let empty = UserLedger::default();
        f(users.get(user_id).unwrap_or(&empty))
    }

    pub(crate) async fn write<T>(&self, user_id: &str, f: impl FnOnce(&mut UserLedger) -> T) -> T {
        let mut users = self.users.write().await;
        f(users.entry(user_id.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn range_is_inclusive_and_validated() {
        let range = DateRange::new(Some(date(2)), Some(date(4))).unwrap();
        assert!(!range.contains(date(1)));
        assert!(range.contains(date(2)));
        assert!(range.contains(date(4)));
        assert!(!range.contains(date(5)));
        assert!(DateRange::default().contains(date(1)));

        assert!(matches!(
            DateRange::new(Some(date(5)), Some(date(4))),
            Err(EngineError::InvalidRange(_))
        ));
    }
}
