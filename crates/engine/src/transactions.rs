//! Transaction primitives.
//!
//! A `Transaction` is a dated, categorized money movement. The sign of
//! `amount` is the source of truth; `kind` is carried alongside it and must
//! agree with it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Category, EngineError, Money, ResultEngine,
    util::{ensure_within_bounds, normalize_required_text},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Kind implied by the sign of `amount`. Zero is treated as an expense.
    #[must_use]
    pub fn of(amount: Money) -> Self {
        if amount.is_positive() {
            Self::Income
        } else {
            Self::Expense
        }
    }

    /// `Income` iff `amount > 0`. A zero amount agrees with either kind since
    /// it contributes nothing to any total.
    #[must_use]
    pub fn agrees_with(self, amount: Money) -> bool {
        amount.is_zero() || self == Self::of(amount)
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub amount: Money,
    pub kind: TransactionKind,
    pub is_paid: bool,
}

impl Transaction {
    /// Creates a settled transaction whose kind is derived from `amount`.
    pub fn new(
        date: NaiveDate,
        description: &str,
        category: Category,
        amount: Money,
    ) -> ResultEngine<Self> {
        ensure_within_bounds(amount, "amount")?;
        Ok(Self {
            id: Uuid::new_v4(),
            date,
            description: normalize_required_text(description, "description")?,
            category,
            amount,
            kind: TransactionKind::of(amount),
            is_paid: true,
        })
    }

    /// Overrides the derived kind, rejecting a kind that contradicts the amount.
    pub fn with_kind(mut self, kind: TransactionKind) -> ResultEngine<Self> {
        ensure_kind_matches(kind, self.amount)?;
        self.kind = kind;
        Ok(self)
    }

    #[must_use]
    pub fn with_paid(mut self, is_paid: bool) -> Self {
        self.is_paid = is_paid;
        self
    }

    /// `true` when the declared kind agrees with the sign of the amount.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.kind.agrees_with(self.amount)
    }
}

pub(crate) fn ensure_kind_matches(kind: TransactionKind, amount: Money) -> ResultEngine<()> {
    if kind.agrees_with(amount) {
        return Ok(());
    }
    Err(EngineError::InvalidAmount(format!(
        "{} transaction cannot have amount {amount}",
        kind.as_str()
    )))
}
