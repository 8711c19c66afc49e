//! Savings goals.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Money, ResultEngine,
    budgets::percentage_of,
    util::{ensure_non_negative, ensure_positive, normalize_required_text},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Money,
    /// May exceed `target_amount`.
    pub saved_amount: Money,
}

impl Goal {
    pub fn new(name: &str, target_amount: Money, saved_amount: Money) -> ResultEngine<Self> {
        let name = normalize_required_text(name, "name")?;
        ensure_positive(target_amount, "target_amount")?;
        ensure_non_negative(saved_amount, "saved_amount")?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            target_amount,
            saved_amount,
        })
    }

    /// Saved share of the target, in whole percent (not capped at 100).
    #[must_use]
    pub fn progress(&self) -> u64 {
        percentage_of(self.saved_amount.amount(), self.target_amount.amount())
    }

    #[must_use]
    pub fn is_reached(&self) -> bool {
        self.saved_amount >= self.target_amount
    }
}
