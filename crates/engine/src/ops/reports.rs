use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    BudgetStatusRow, CategoryBreakdown, Checked, DateRange, Money, MonthlyTotals, ResultEngine,
    SeriesPoint, Transaction, YearMonth, compute_balance, compute_category_breakdown,
    compute_monthly_totals, compute_time_series, evaluate_budgets,
};

use super::Engine;

/// Everything the dashboard screen shows for one month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    pub month: YearMonth,
    /// Balance as of the last day of `month`.
    pub balance: Money,
    pub totals: MonthlyTotals,
    /// In canonical category order.
    pub breakdown: CategoryBreakdown,
    /// Oldest first, ending at `month`.
    pub series: Vec<SeriesPoint>,
    /// Union of the integrity faults of every part, sorted.
    pub faulty_transactions: Vec<Uuid>,
}

impl Engine {
    pub async fn balance(
        &self,
        user_id: &str,
        as_of: NaiveDate,
        include_unpaid: bool,
    ) -> ResultEngine<Checked<Money>> {
        let transactions = self.store.transactions(user_id, None).await;
        compute_balance(&transactions, as_of, include_unpaid)
    }

    pub async fn monthly_totals(&self, user_id: &str, month: YearMonth) -> Checked<MonthlyTotals> {
        let transactions = self.month_snapshot(user_id, month).await;
        compute_monthly_totals(&transactions, month)
    }

    pub async fn category_breakdown(
        &self,
        user_id: &str,
        month: YearMonth,
    ) -> Checked<CategoryBreakdown> {
        let transactions = self.month_snapshot(user_id, month).await;
        compute_category_breakdown(&transactions, month)
    }

    pub async fn time_series(
        &self,
        user_id: &str,
        start: YearMonth,
        month_count: u32,
    ) -> ResultEngine<Checked<Vec<SeriesPoint>>> {
        let transactions = self.store.transactions(user_id, None).await;
        compute_time_series(&transactions, start, month_count)
    }

    /// Status of every budget the user set for `month`.
    pub async fn budget_status(
        &self,
        user_id: &str,
        month: YearMonth,
    ) -> Checked<Vec<BudgetStatusRow>> {
        let breakdown = self.category_breakdown(user_id, month).await;
        let budgets = self.store.budgets(user_id).await;
        breakdown.map(|breakdown| evaluate_budgets(&breakdown, &budgets, month))
    }

    /// Computes every dashboard figure from a single snapshot.
    pub async fn dashboard(
        &self,
        user_id: &str,
        month: YearMonth,
        series_months: u32,
        include_unpaid: bool,
    ) -> ResultEngine<Dashboard> {
        let transactions = self.store.transactions(user_id, None).await;

        let balance = compute_balance(&transactions, month.last_day(), include_unpaid)?;
        let totals = compute_monthly_totals(&transactions, month);
        let breakdown = compute_category_breakdown(&transactions, month);
        let start = month.sub_months(series_months.saturating_sub(1))?;
        let series = compute_time_series(&transactions, start, series_months)?;

        let mut faulty_transactions: Vec<Uuid> = [
            balance.faulty_ids(),
            totals.faulty_ids(),
            breakdown.faulty_ids(),
            series.faulty_ids(),
        ]
        .concat();
        faulty_transactions.sort_unstable();
        faulty_transactions.dedup();

        Ok(Dashboard {
            month,
            balance: balance.into_value(),
            totals: totals.into_value(),
            breakdown: breakdown.into_value().canonical(),
            series: series.into_value(),
            faulty_transactions,
        })
    }

    async fn month_snapshot(&self, user_id: &str, month: YearMonth) -> Vec<Transaction> {
        let range = DateRange {
            from: Some(month.first_day()),
            to: Some(month.last_day()),
        };
        self.store.transactions(user_id, Some(range)).await
    }
}
