//! Read-side projections over a transaction snapshot.
//!
//! Everything here is a pure function of its arguments: no I/O, no shared
//! state, no interior mutability. Sums are accumulated at full decimal
//! precision and rounded to cents once, at the end.
//!
//! Transactions whose declared kind contradicts the sign of their amount are
//! left out of every sum and reported through [`Checked::fault`].

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{Category, EngineError, Money, ResultEngine, Transaction, YearMonth};

/// Balances cannot be requested before this year.
pub const EARLIEST_YEAR: i32 = 1900;

/// Longest time series a caller may request (100 years).
pub const MAX_SERIES_MONTHS: u32 = 1200;

/// Records excluded from an aggregate because `kind` and `amount` disagree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{} transaction(s) excluded: kind disagrees with amount sign",
    .transaction_ids.len()
)]
pub struct DataIntegrityFault {
    /// Sorted, without duplicates.
    pub transaction_ids: Vec<Uuid>,
}

/// A computed value plus the integrity fault found while computing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked<T> {
    pub value: T,
    pub fault: Option<DataIntegrityFault>,
}

impl<T> Checked<T> {
    fn new(value: T, mut rejected: Vec<Uuid>) -> Self {
        rejected.sort_unstable();
        rejected.dedup();
        let fault = (!rejected.is_empty()).then_some(DataIntegrityFault {
            transaction_ids: rejected,
        });
        Self { value, fault }
    }

    /// Ids of the excluded transactions (empty when the input was clean).
    #[must_use]
    pub fn faulty_ids(&self) -> &[Uuid] {
        self.fault
            .as_ref()
            .map(|fault| fault.transaction_ids.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.fault.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Checked<U> {
        Checked {
            value: f(self.value),
            fault: self.fault,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotals {
    pub month: YearMonth,
    pub income: Money,
    /// Absolute value of the month's outflows.
    pub expenses: Money,
    pub net: Money,
}

/// Spend per category for one month, sparse and in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    entries: Vec<(Category, Money)>,
}

impl CategoryBreakdown {
    #[must_use]
    pub fn get(&self, category: Category) -> Option<Money> {
        self.entries
            .iter()
            .find_map(|(c, amount)| (*c == category).then_some(*amount))
    }

    /// Spend for `category`, zero when absent.
    #[must_use]
    pub fn spent(&self, category: Category) -> Money {
        self.get(category).unwrap_or(Money::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Money)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> Money {
        self.entries.iter().map(|(_, amount)| *amount).sum()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.entries.iter().map(|(c, _)| *c).collect()
    }

    #[must_use]
    pub fn amounts(&self) -> Vec<Money> {
        self.entries.iter().map(|(_, amount)| *amount).collect()
    }

    /// Reorders entries by [`Category::ALL`] for charts that need a fixed order.
    #[must_use]
    pub fn canonical(mut self) -> Self {
        self.entries.sort_by(|a, b| a.0.canonical_cmp(b.0));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub month: YearMonth,
    pub income: Money,
    pub expenses: Money,
}

/// Splits `transactions` into consistent ones (returned) and faulty ids
/// (appended to `rejected`).
fn screen<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    rejected: &mut Vec<Uuid>,
) -> Vec<&'a Transaction> {
    transactions
        .into_iter()
        .filter(|tx| {
            if tx.is_consistent() {
                true
            } else {
                rejected.push(tx.id);
                false
            }
        })
        .collect()
}

fn in_month(
    transactions: &[Transaction],
    month: YearMonth,
) -> impl Iterator<Item = &Transaction> {
    transactions.iter().filter(move |tx| month.contains(tx.date))
}

/// Sum of settled amounts (plus pending ones when `include_unpaid`) dated on
/// or before `as_of`.
pub fn compute_balance(
    transactions: &[Transaction],
    as_of: NaiveDate,
    include_unpaid: bool,
) -> ResultEngine<Checked<Money>> {
    if as_of.year() < EARLIEST_YEAR {
        return Err(EngineError::InvalidRange(format!(
            "as_of {as_of} is before {EARLIEST_YEAR}-01-01"
        )));
    }

    let mut rejected = Vec::new();
    let counted = transactions
        .iter()
        .filter(|tx| tx.date <= as_of && (tx.is_paid || include_unpaid));
    let total: Money = screen(counted, &mut rejected)
        .into_iter()
        .map(|tx| tx.amount)
        .sum();

    Ok(Checked::new(total.round_currency(), rejected))
}

/// Income, expenses and net for one calendar month. Pending transactions are
/// included.
pub fn compute_monthly_totals(
    transactions: &[Transaction],
    month: YearMonth,
) -> Checked<MonthlyTotals> {
    let mut rejected = Vec::new();
    let mut income = Money::ZERO;
    let mut expenses = Money::ZERO;

    for tx in screen(in_month(transactions, month), &mut rejected) {
        if tx.amount.is_positive() {
            income += tx.amount;
        } else if tx.amount.is_negative() {
            expenses += tx.amount.abs();
        }
    }

    let income = income.round_currency();
    let expenses = expenses.round_currency();
    Checked::new(
        MonthlyTotals {
            month,
            income,
            expenses,
            net: income - expenses,
        },
        rejected,
    )
}

/// Absolute expense per category for one month, ordered by first occurrence.
///
/// The rounded amounts always add up to
/// [`compute_monthly_totals`]`(..).expenses` for the same input.
pub fn compute_category_breakdown(
    transactions: &[Transaction],
    month: YearMonth,
) -> Checked<CategoryBreakdown> {
    let mut rejected = Vec::new();
    let mut raw: Vec<(Category, Decimal)> = Vec::new();

    for tx in screen(in_month(transactions, month), &mut rejected)
        .into_iter()
        .filter(|tx| tx.amount.is_negative())
    {
        let amount = tx.amount.abs().amount();
        match raw.iter_mut().find(|(category, _)| *category == tx.category) {
            Some((_, sum)) => *sum += amount,
            None => raw.push((tx.category, amount)),
        }
    }

    Checked::new(
        CategoryBreakdown {
            entries: reconcile(raw),
        },
        rejected,
    )
}

/// Rounds each part to cents so that the parts add up to the rounded whole.
///
/// Leftover cents go to the parts with the largest rounding remainder (or are
/// taken from the smallest), ties resolved by position. Parts that end at
/// zero are dropped.
fn reconcile(raw: Vec<(Category, Decimal)>) -> Vec<(Category, Money)> {
    let total = Money::new(raw.iter().map(|(_, v)| *v).sum()).round_currency();
    let mut rounded: Vec<(Category, Money)> = raw
        .iter()
        .map(|(category, v)| (*category, Money::new(*v).round_currency()))
        .collect();

    let mut residual = total - rounded.iter().map(|(_, m)| *m).sum::<Money>();
    if !residual.is_zero() {
        let remainders: Vec<Decimal> = raw
            .iter()
            .zip(&rounded)
            .map(|((_, v), (_, r))| *v - r.amount())
            .collect();
        let mut order: Vec<usize> = (0..rounded.len()).collect();
        let step = if residual.is_positive() {
            order.sort_by(|a, b| remainders[*b].cmp(&remainders[*a]));
            Money::from_minor(1)
        } else {
            order.sort_by(|a, b| remainders[*a].cmp(&remainders[*b]));
            Money::from_minor(-1)
        };

        for index in order.iter().cycle() {
            if residual.is_zero() {
                break;
            }
            rounded[*index].1 += step;
            residual -= step;
        }
    }

    rounded.retain(|(_, amount)| !amount.is_zero());
    rounded
}

/// `month_count` consecutive months starting at `start`, zero-filled.
///
/// `month_count` must be in `1..=MAX_SERIES_MONTHS` and the whole window must
/// fit in the calendar.
pub fn compute_time_series(
    transactions: &[Transaction],
    start: YearMonth,
    month_count: u32,
) -> ResultEngine<Checked<Vec<SeriesPoint>>> {
    if !(1..=MAX_SERIES_MONTHS).contains(&month_count) {
        return Err(EngineError::InvalidRange(format!(
            "month count must be between 1 and {MAX_SERIES_MONTHS}"
        )));
    }
    start.add_months(month_count - 1)?;

    let mut rejected = Vec::new();
    let mut points: Vec<SeriesPoint> = Vec::with_capacity(month_count as usize);
    for offset in 0..month_count {
        let totals = compute_monthly_totals(transactions, start.add_months(offset)?);
        rejected.extend_from_slice(totals.faulty_ids());
        points.push(SeriesPoint {
            month: totals.value.month,
            income: totals.value.income,
            expenses: totals.value.expenses,
        });
    }

    Ok(Checked::new(points, rejected))
}
