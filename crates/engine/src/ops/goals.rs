use uuid::Uuid;

use crate::{
    EngineError, Goal, Money, ResultEngine,
    util::{ensure_non_negative, ensure_positive, normalize_required_text},
};

use super::Engine;

#[derive(Clone, Debug)]
pub struct GoalNew {
    pub name: String,
    pub target_amount: Money,
    pub saved_amount: Money,
}

/// Partial update: `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    pub saved_amount: Option<Money>,
}

fn not_found(id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("goal {id}"))
}

impl Engine {
    pub async fn create_goal(&self, user_id: &str, cmd: GoalNew) -> ResultEngine<Uuid> {
        let goal = Goal::new(&cmd.name, cmd.target_amount, cmd.saved_amount)?;
        let id = goal.id;
        self.store
            .write(user_id, |ledger| ledger.goals.push(goal))
            .await;
        Ok(id)
    }

    pub async fn list_goals(&self, user_id: &str) -> Vec<Goal> {
        self.store.goals(user_id).await
    }

    pub async fn update_goal(
        &self,
        user_id: &str,
        id: Uuid,
        patch: GoalPatch,
    ) -> ResultEngine<Goal> {
        let name = patch
            .name
            .as_deref()
            .map(|value| normalize_required_text(value, "name"))
            .transpose()?;
        if let Some(target) = patch.target_amount {
            ensure_positive(target, "target_amount")?;
        }
        if let Some(saved) = patch.saved_amount {
            ensure_non_negative(saved, "saved_amount")?;
        }

        self.store
            .write(user_id, |ledger| -> ResultEngine<Goal> {
                let goal = ledger
                    .goals
                    .iter_mut()
                    .find(|g| g.id == id)
                    .ok_or_else(|| not_found(id))?;
                if let Some(name) = name {
                    goal.name = name;
                }
                if let Some(target) = patch.target_amount {
                    goal.target_amount = target;
                }
                if let Some(saved) = patch.saved_amount {
                    goal.saved_amount = saved;
                }
                Ok(goal.clone())
            })
            .await
    }

    pub async fn delete_goal(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        self.store
            .write(user_id, |ledger| -> ResultEngine<()> {
                let position = ledger
                    .goals
                    .iter()
                    .position(|g| g.id == id)
                    .ok_or_else(|| not_found(id))?;
                ledger.goals.remove(position);
                Ok(())
            })
            .await
    }
}
