use uuid::Uuid;

use crate::{
    Budget, Category, EngineError, Money, ResultEngine, YearMonth, util::ensure_non_negative,
};

use super::Engine;

#[derive(Clone, Debug)]
pub struct BudgetNew {
    pub category: Category,
    pub month: YearMonth,
    pub limit: Money,
}

fn not_found(id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("budget {id}"))
}

impl Engine {
    /// Fails with `ExistingKey` if the user already has a budget for the same
    /// category and month.
    pub async fn create_budget(&self, user_id: &str, cmd: BudgetNew) -> ResultEngine<Uuid> {
        let budget = Budget::new(cmd.category, cmd.month, cmd.limit)?;
        self.store
            .write(user_id, |ledger| -> ResultEngine<Uuid> {
                if ledger
                    .budgets
                    .iter()
                    .any(|b| b.category == budget.category && b.month == budget.month)
                {
                    return Err(EngineError::ExistingKey(format!(
                        "budget {} {}",
                        budget.category, budget.month
                    )));
                }
                let id = budget.id;
                ledger.budgets.push(budget);
                Ok(id)
            })
            .await
    }

    /// Budgets in creation order, optionally only those of `month`.
    pub async fn list_budgets(&self, user_id: &str, month: Option<YearMonth>) -> Vec<Budget> {
        let mut budgets = self.store.budgets(user_id).await;
        if let Some(month) = month {
            budgets.retain(|b| b.month == month);
        }
        budgets
    }

    pub async fn update_budget_limit(
        &self,
        user_id: &str,
        id: Uuid,
        limit: Money,
    ) -> ResultEngine<Budget> {
        ensure_non_negative(limit, "limit")?;
        self.store
            .write(user_id, |ledger| -> ResultEngine<Budget> {
                let budget = ledger
                    .budgets
                    .iter_mut()
                    .find(|b| b.id == id)
                    .ok_or_else(|| not_found(id))?;
                budget.limit = limit;
                Ok(budget.clone())
            })
            .await
    }

    pub async fn delete_budget(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        self.store
            .write(user_id, |ledger| -> ResultEngine<()> {
                let position = ledger
                    .budgets
                    .iter()
                    .position(|b| b.id == id)
                    .ok_or_else(|| not_found(id))?;
                ledger.budgets.remove(position);
                Ok(())
            })
            .await
    }
}
