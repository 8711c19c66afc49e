use base64::Engine as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Category, DateRange, EngineError, Money, ResultEngine, Transaction, TransactionKind,
    transactions::ensure_kind_matches,
    util::{ensure_within_bounds, normalize_required_text},
};

use super::Engine;

pub const DEFAULT_PAGE_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 500;

/// Input for [`Engine::create_transaction`].
#[derive(Clone, Debug)]
pub struct TransactionNew {
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub amount: Money,
    /// Derived from the sign of `amount` when absent.
    pub kind: Option<TransactionKind>,
    pub is_paid: bool,
}

/// Partial update: `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub amount: Option<Money>,
    pub kind: Option<TransactionKind>,
    pub is_paid: Option<bool>,
}

/// Filters for listing transactions. Both ends are inclusive.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    date: NaiveDate,
    transaction_id: Uuid,
}

impl TransactionsCursor {
    fn of(tx: &Transaction) -> Self {
        Self {
            date: tx.date,
            transaction_id: tx.id,
        }
    }

    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))
    }

    /// `true` when `tx` sorts strictly after the cursor in `(date, id)` desc.
    fn precedes(&self, tx: &Transaction) -> bool {
        (tx.date, tx.id) < (self.date, self.transaction_id)
    }
}

fn not_found(id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("transaction {id}"))
}

impl Engine {
    pub async fn create_transaction(
        &self,
        user_id: &str,
        cmd: TransactionNew,
    ) -> ResultEngine<Uuid> {
        let mut tx = Transaction::new(cmd.date, &cmd.description, cmd.category, cmd.amount)?
            .with_paid(cmd.is_paid);
        if let Some(kind) = cmd.kind {
            tx = tx.with_kind(kind)?;
        }

        let id = tx.id;
        self.store
            .write(user_id, |ledger| ledger.transactions.push(tx))
            .await;
        Ok(id)
    }

    /// Appends records as they are, without kind/amount sign validation.
    ///
    /// Inconsistent records are later excluded from aggregates and reported
    /// as integrity faults. Amounts out of bounds reject the whole batch.
    pub async fn import_transactions(
        &self,
        user_id: &str,
        transactions: impl IntoIterator<Item = Transaction>,
    ) -> ResultEngine<usize> {
        let transactions: Vec<Transaction> = transactions.into_iter().collect();
        for tx in &transactions {
            ensure_within_bounds(tx.amount, "amount")?;
        }

        let count = transactions.len();
        self.store
            .write(user_id, |ledger| ledger.transactions.extend(transactions))
            .await;
        Ok(count)
    }

    pub async fn transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<Transaction> {
        self.store
            .read(user_id, |ledger| {
                ledger.transactions.iter().find(|tx| tx.id == id).cloned()
            })
            .await
            .ok_or_else(|| not_found(id))
    }

    /// Applies `patch` and returns the updated record.
    ///
    /// When the amount changes and no kind is given, the kind is derived again
    /// from the new amount.
    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        if let Some(amount) = patch.amount {
            ensure_within_bounds(amount, "amount")?;
        }
        let description = patch
            .description
            .as_deref()
            .map(|value| normalize_required_text(value, "description"))
            .transpose()?;

        self.store
            .write(user_id, |ledger| -> ResultEngine<Transaction> {
                let tx = ledger
                    .transactions
                    .iter_mut()
                    .find(|tx| tx.id == id)
                    .ok_or_else(|| not_found(id))?;

                let amount = patch.amount.unwrap_or(tx.amount);
                let kind = match (patch.kind, patch.amount) {
                    (Some(kind), _) => kind,
                    (None, Some(amount)) => TransactionKind::of(amount),
                    (None, None) => tx.kind,
                };
                ensure_kind_matches(kind, amount)?;

                tx.amount = amount;
                tx.kind = kind;
                if let Some(date) = patch.date {
                    tx.date = date;
                }
                if let Some(description) = description {
                    tx.description = description;
                }
                if let Some(category) = patch.category {
                    tx.category = category;
                }
                if let Some(is_paid) = patch.is_paid {
                    tx.is_paid = is_paid;
                }
                Ok(tx.clone())
            })
            .await
    }

    pub async fn toggle_transaction_paid(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<Transaction> {
        self.store
            .write(user_id, |ledger| -> ResultEngine<Transaction> {
                let tx = ledger
                    .transactions
                    .iter_mut()
                    .find(|tx| tx.id == id)
                    .ok_or_else(|| not_found(id))?;
                tx.is_paid = !tx.is_paid;
                Ok(tx.clone())
            })
            .await
    }

    pub async fn delete_transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        self.store
            .write(user_id, |ledger| -> ResultEngine<()> {
                let position = ledger
                    .transactions
                    .iter()
                    .position(|tx| tx.id == id)
                    .ok_or_else(|| not_found(id))?;
                ledger.transactions.remove(position);
                Ok(())
            })
            .await
    }

    /// Lists transactions with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(date DESC, id DESC)`. `limit` above
    /// [`MAX_PAGE_LIMIT`] is clamped. The returned cursor is `Some` only when
    /// more items exist.
    pub async fn list_transactions_page(
        &self,
        user_id: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<(Vec<Transaction>, Option<String>)> {
        if limit == 0 {
            return Err(EngineError::Validation("limit must be >= 1".to_string()));
        }
        let limit = usize::try_from(limit.min(MAX_PAGE_LIMIT)).unwrap_or(usize::MAX);
        let range = DateRange::new(filter.from, filter.to)?;
        let cursor = cursor.map(TransactionsCursor::decode).transpose()?;

        let mut items = self.store.transactions(user_id, Some(range)).await;
        items.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));
        if let Some(cursor) = &cursor {
            items.retain(|tx| cursor.precedes(tx));
        }

        let next = if items.len() > limit {
            items.truncate(limit);
            items.last().map(TransactionsCursor::of)
        } else {
            None
        };
        let next = next.map(|cursor| cursor.encode()).transpose()?;

        Ok((items, next))
    }
}
