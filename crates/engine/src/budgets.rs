//! Monthly spending limits and their evaluation against actual spend.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Category, CategoryBreakdown, Money, ResultEngine, YearMonth, util::ensure_non_negative,
};

/// Above this percentage a budget is a warning.
pub const WARNING_ABOVE: u64 = 70;
/// Above this percentage a budget is exceeded.
pub const EXCEEDED_ABOVE: u64 = 90;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub category: Category,
    pub month: YearMonth,
    pub limit: Money,
}

impl Budget {
    pub fn new(category: Category, month: YearMonth, limit: Money) -> ResultEngine<Self> {
        ensure_non_negative(limit, "limit")?;
        Ok(Self {
            id: Uuid::new_v4(),
            category,
            month,
            limit,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    /// 70 and 90 fall in the lower band.
    #[must_use]
    pub fn from_percentage(percentage: u64) -> Self {
        if percentage > EXCEEDED_ABOVE {
            Self::Exceeded
        } else if percentage > WARNING_ABOVE {
            Self::Warning
        } else {
            Self::Ok
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetStatusRow {
    pub budget_id: Uuid,
    pub category: Category,
    pub limit: Money,
    pub spent: Money,
    /// Negative once the budget is overspent.
    pub remaining: Money,
    pub percentage: u64,
    pub status: BudgetStatus,
}

/// `round_half_away(100 * spent / limit)`, saturating at `u64::MAX`.
///
/// A zero limit yields 0.
#[must_use]
pub fn spent_percentage(spent: Money, limit: Money) -> u64 {
    if !limit.is_positive() {
        return 0;
    }
    percentage_of(spent.amount(), limit.amount())
}

pub(crate) fn percentage_of(part: Decimal, whole: Decimal) -> u64 {
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .map(|ratio| ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .map_or(u64::MAX, |ratio| ratio.to_u64().unwrap_or(u64::MAX))
}

/// One row per budget of `month`, in input order.
///
/// Categories without a budget are not reported; budgets without spend get
/// `spent = 0`.
#[must_use]
pub fn evaluate_budgets(
    breakdown: &CategoryBreakdown,
    budgets: &[Budget],
    month: YearMonth,
) -> Vec<BudgetStatusRow> {
    budgets
        .iter()
        .filter(|budget| budget.month == month)
        .map(|budget| {
            let spent = breakdown.spent(budget.category);
            let percentage = spent_percentage(spent, budget.limit);
            let status = if budget.limit.is_positive() {
                BudgetStatus::from_percentage(percentage)
            } else {
                BudgetStatus::Ok
            };
            BudgetStatusRow {
                budget_id: budget.id,
                category: budget.category,
                limit: budget.limit,
                spent,
                remaining: budget.limit - spent,
                percentage,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{EngineError, Transaction, compute_category_breakdown};

    fn july() -> YearMonth {
        YearMonth::new(2024, 7).unwrap()
    }

    fn spend(category: Category, amount: Decimal) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        Transaction::new(date, "test", category, Money::new(-amount)).unwrap()
    }

    #[test]
    fn leisure_at_88_percent_is_a_warning() {
        let breakdown =
            compute_category_breakdown(&[spend(Category::Leisure, dec!(350.00))], july()).value;
        let budget = Budget::new(Category::Leisure, july(), Money::new(dec!(400.00))).unwrap();

        let rows = evaluate_budgets(&breakdown, &[budget.clone()], july());
        assert_eq!(
            rows,
            vec![BudgetStatusRow {
                budget_id: budget.id,
                category: Category::Leisure,
                limit: Money::new(dec!(400.00)),
                spent: Money::new(dec!(350.00)),
                remaining: Money::new(dec!(50.00)),
                percentage: 88,
                status: BudgetStatus::Warning,
            }]
        );
    }

    #[test]
    fn zero_limit_is_ok_at_zero_percent() {
        let breakdown =
            compute_category_breakdown(&[spend(Category::Food, dec!(10))], july()).value;
        let budget = Budget::new(Category::Food, july(), Money::ZERO).unwrap();

        let rows = evaluate_budgets(&breakdown, &[budget], july());
        assert_eq!(rows[0].percentage, 0);
        assert_eq!(rows[0].status, BudgetStatus::Ok);
        assert_eq!(rows[0].remaining, Money::new(dec!(-10)));
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(BudgetStatus::from_percentage(70), BudgetStatus::Ok);
        assert_eq!(BudgetStatus::from_percentage(71), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::from_percentage(90), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::from_percentage(91), BudgetStatus::Exceeded);
        assert_eq!(BudgetStatus::from_percentage(250), BudgetStatus::Exceeded);
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        // 1 / 200 = 0.5%
        assert_eq!(spent_percentage(Money::new(dec!(1)), Money::new(dec!(200))), 1);
        // 140 / 200 = 70% exactly
        assert_eq!(spent_percentage(Money::new(dec!(140)), Money::new(dec!(200))), 70);
    }

    #[test]
    fn only_budgets_of_the_month_are_reported() {
        let breakdown = CategoryBreakdown::default();
        let budgets = vec![
            Budget::new(Category::Food, july(), Money::new(dec!(100))).unwrap(),
            Budget::new(Category::Food, july().next().unwrap(), Money::new(dec!(100))).unwrap(),
            Budget::new(Category::Health, july(), Money::new(dec!(50))).unwrap(),
        ];

        let rows = evaluate_budgets(&breakdown, &budgets, july());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, Category::Food);
        assert_eq!(rows[1].category, Category::Health);
        assert!(rows.iter().all(|row| row.spent == Money::ZERO));
    }

    #[test]
    fn negative_limit_is_rejected() {
        assert!(matches!(
            Budget::new(Category::Food, july(), Money::new(dec!(-1))),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
