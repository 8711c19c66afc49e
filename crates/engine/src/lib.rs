//! Monthly financial aggregation engine.
//!
//! The pure functions in [`aggregation`] and [`budgets`] turn a snapshot of
//! transactions into balances, monthly totals, category breakdowns, time
//! series and budget statuses. [`Engine`] wraps them together with a
//! per-user in-memory store.

pub use aggregation::{
    CategoryBreakdown, Checked, DataIntegrityFault, EARLIEST_YEAR, MAX_SERIES_MONTHS,
    MonthlyTotals, SeriesPoint, compute_balance, compute_category_breakdown,
    compute_monthly_totals, compute_time_series,
};
pub use budgets::{Budget, BudgetStatus, BudgetStatusRow, evaluate_budgets, spent_percentage};
pub use categories::Category;
pub use error::EngineError;
pub use goals::Goal;
pub use ledger::{DateRange, MemoryStore, UserLedger};
pub use money::{CURRENCY_DP, Money};
pub use month::YearMonth;
pub use ops::{
    BudgetNew, DEFAULT_PAGE_LIMIT, Dashboard, Engine, EngineBuilder, GoalNew, GoalPatch,
    MAX_PAGE_LIMIT, TransactionListFilter, TransactionNew, TransactionPatch,
};
pub use transactions::{Transaction, TransactionKind};

pub mod aggregation;
pub mod budgets;
mod categories;
mod error;
mod goals;
mod ledger;
mod money;
mod month;
mod ops;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
