use crate::{MemoryStore, ResultEngine};

mod budgets;
mod goals;
mod reports;
mod transactions;

pub use budgets::BudgetNew;
pub use goals::{GoalNew, GoalPatch};
pub use reports::Dashboard;
pub use transactions::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, TransactionListFilter, TransactionNew, TransactionPatch,
};

/// Entry point for every user-scoped operation.
///
/// Write operations validate their input before touching the store; report
/// operations take a snapshot and aggregate outside the lock.
#[derive(Debug)]
pub struct Engine {
    store: MemoryStore,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Direct access to the backing store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: MemoryStore,
}

impl EngineBuilder {
    /// Pass a pre-populated store
    pub fn store(mut self, store: MemoryStore) -> EngineBuilder {
        self.store = store;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine { store: self.store })
    }
}
