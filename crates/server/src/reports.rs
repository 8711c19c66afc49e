//! Reports and dashboard API endpoints

use api_types::report::{
    BalanceQuery, BalanceView, ChartData, DashboardSummary, MonthQuery, MonthlyTotalsView,
    SeriesPointView, SeriesQuery, Summary,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::{CategoryBreakdown, SeriesPoint};

use crate::{
    ServerError,
    parse::{log_fault, month_count, month_or_current, required_month, today},
    server::{ServerState, UserId},
};

fn chart(breakdown: &CategoryBreakdown) -> ChartData {
    ChartData {
        labels: breakdown
            .categories()
            .into_iter()
            .map(|c| c.label().to_string())
            .collect(),
        data: breakdown
            .amounts()
            .into_iter()
            .map(|amount| amount.amount())
            .collect(),
    }
}

fn series_view(points: Vec<SeriesPoint>) -> Vec<SeriesPointView> {
    points
        .into_iter()
        .map(|point| SeriesPointView {
            month: point.month.to_string(),
            income: point.income.amount(),
            expenses: point.expenses.amount(),
        })
        .collect()
}

/// Handle requests for the dashboard figures of a month
pub async fn dashboard(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<DashboardSummary>, ServerError> {
    let month = month_or_current(query.month.as_deref())?;
    let dashboard = state
        .engine
        .dashboard(
            &user,
            month,
            state.reports.series_months,
            state.reports.include_unpaid_in_balance,
        )
        .await?;

    if !dashboard.faulty_transactions.is_empty() {
        tracing::warn!(
            %user,
            %month,
            transaction_ids = ?dashboard.faulty_transactions,
            "dashboard excluded inconsistent transactions"
        );
    }

    Ok(Json(DashboardSummary {
        summary: Summary {
            saldo_total: dashboard.balance.amount(),
            receitas_mes: dashboard.totals.income.amount(),
            despesas_mes: dashboard.totals.expenses.amount(),
            economia_mes: dashboard.totals.net.amount(),
        },
        expenses_by_category: chart(&dashboard.breakdown),
        income_vs_expense: series_view(dashboard.series),
        faulty_transactions: dashboard.faulty_transactions,
    }))
}

/// Handle requests for the category breakdown of a month
pub async fn breakdown(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ChartData>, ServerError> {
    let month = required_month(query.month.as_deref())?;
    let breakdown = state.engine.category_breakdown(&user, month).await;
    let breakdown = log_fault(breakdown, &user, "reports");
    Ok(Json(chart(&breakdown)))
}

pub async fn monthly(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyTotalsView>, ServerError> {
    let month = month_or_current(query.month.as_deref())?;
    let totals = state.engine.monthly_totals(&user, month).await;
    let totals = log_fault(totals, &user, "monthly");
    Ok(Json(MonthlyTotalsView {
        month: totals.month.to_string(),
        income: totals.income.amount(),
        expenses: totals.expenses.amount(),
        net: totals.net.amount(),
    }))
}

pub async fn series(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Vec<SeriesPointView>>, ServerError> {
    let start = query.start.parse()?;
    let count = month_count(query.months)?;
    let series = state.engine.time_series(&user, start, count).await?;
    Ok(Json(series_view(log_fault(series, &user, "series"))))
}

pub async fn balance(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceView>, ServerError> {
    let as_of = query.as_of.unwrap_or_else(today);
    let include_unpaid = query
        .include_unpaid
        .unwrap_or(state.reports.include_unpaid_in_balance);
    let balance = state.engine.balance(&user, as_of, include_unpaid).await?;
    Ok(Json(BalanceView {
        as_of,
        balance: log_fault(balance, &user, "balance").amount(),
        include_unpaid,
    }))
}
