//! Savings goals API endpoints

use api_types::{
    Created,
    goal::{GoalNew, GoalUpdate, GoalView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Goal, GoalPatch, Money};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, UserId},
};

fn view(goal: Goal) -> GoalView {
    GoalView {
        id: goal.id,
        progress: goal.progress(),
        name: goal.name,
        target_amount: goal.target_amount.amount(),
        saved_amount: goal.saved_amount.amount(),
    }
}

pub async fn list(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<GoalView>>, ServerError> {
    let goals = state.engine.list_goals(&user).await;
    Ok(Json(goals.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let cmd = engine::GoalNew {
        name: payload.name,
        target_amount: Money::new(payload.target_amount),
        saved_amount: Money::new(payload.saved_amount),
    };

    let id = state.engine.create_goal(&user, cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let patch = GoalPatch {
        name: payload.name,
        target_amount: payload.target_amount.map(Money::new),
        saved_amount: payload.saved_amount.map(Money::new),
    };

    let goal = state.engine.update_goal(&user, id, patch).await?;
    Ok(Json(view(goal)))
}

pub async fn delete(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
