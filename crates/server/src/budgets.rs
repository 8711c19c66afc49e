//! Budgets API endpoints

use api_types::{
    Created,
    budget::{BudgetNew, BudgetStatus as ApiStatus, BudgetStatusView, BudgetUpdate, BudgetView},
    report::MonthQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Budget, BudgetStatus, Money};
use uuid::Uuid;

use crate::{
    ServerError,
    parse::{category, log_fault, month_or_current},
    server::{ServerState, UserId},
};

fn map_status(status: BudgetStatus) -> ApiStatus {
    match status {
        BudgetStatus::Ok => ApiStatus::Ok,
        BudgetStatus::Warning => ApiStatus::Warning,
        BudgetStatus::Exceeded => ApiStatus::Exceeded,
    }
}

fn view(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category: budget.category.label().to_string(),
        month: budget.month.to_string(),
        limit: budget.limit.amount(),
    }
}

pub async fn list(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let month = query.month.as_deref().map(str::parse).transpose()?;
    let budgets = state.engine.list_budgets(&user, month).await;
    Ok(Json(budgets.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let cmd = engine::BudgetNew {
        category: category(&payload.category)?,
        month: payload.month.parse()?,
        limit: Money::new(payload.limit),
    };

    let id = state.engine.create_budget(&user, cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .update_budget_limit(&user, id, Money::new(payload.limit))
        .await?;
    Ok(Json(view(budget)))
}

pub async fn delete(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for budget consumption of a month
pub async fn status(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<BudgetStatusView>>, ServerError> {
    let month = month_or_current(query.month.as_deref())?;
    let rows = state.engine.budget_status(&user, month).await;
    let rows = log_fault(rows, &user, "budget status");

    Ok(Json(
        rows.into_iter()
            .map(|row| BudgetStatusView {
                budget_id: row.budget_id,
                category: row.category.label().to_string(),
                limit: row.limit.amount(),
                spent: row.spent.amount(),
                remaining: row.remaining.amount(),
                percentage: row.percentage,
                status: map_status(row.status),
            })
            .collect(),
    ))
}
