//! Transactions API endpoints

use api_types::{
    Created,
    transaction::{
        TransactionKind as ApiKind, TransactionList, TransactionListResponse, TransactionNew,
        TransactionUpdate, TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Money, TransactionKind, TransactionListFilter, TransactionPatch};
use uuid::Uuid;

use crate::{
    ServerError,
    parse::category,
    server::{ServerState, UserId},
};

fn map_kind(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Expense => ApiKind::Expense,
    }
}

fn engine_kind(kind: ApiKind) -> TransactionKind {
    match kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Expense => TransactionKind::Expense,
    }
}

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        date: tx.date,
        description: tx.description,
        category: tx.category.label().to_string(),
        amount: tx.amount.amount(),
        kind: map_kind(tx.kind),
        is_paid: tx.is_paid,
    }
}

pub async fn list(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(engine::DEFAULT_PAGE_LIMIT);
    let filter = TransactionListFilter {
        from: query.from,
        to: query.to,
    };

    let (txs, next_cursor) = state
        .engine
        .list_transactions_page(&user, limit, query.cursor.as_deref(), &filter)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: txs.into_iter().map(view).collect(),
        next_cursor,
    }))
}

pub async fn create(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let cmd = engine::TransactionNew {
        date: payload.date,
        description: payload.description,
        category: category(&payload.category)?,
        amount: Money::new(payload.amount),
        kind: payload.kind.map(engine_kind),
        is_paid: payload.is_paid,
    };

    let id = state.engine.create_transaction(&user, cmd).await?;
    tracing::debug!(%user, %id, "transaction created");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn get(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(&user, id).await?;
    Ok(Json(view(tx)))
}

pub async fn update(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let patch = TransactionPatch {
        date: payload.date,
        description: payload.description,
        category: payload.category.as_deref().map(category).transpose()?,
        amount: payload.amount.map(Money::new),
        kind: payload.kind.map(engine_kind),
        is_paid: payload.is_paid,
    };

    let tx = state.engine.update_transaction(&user, id, patch).await?;
    Ok(Json(view(tx)))
}

pub async fn toggle_paid(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.toggle_transaction_paid(&user, id).await?;
    Ok(Json(view(tx)))
}

pub async fn delete(
    Extension(UserId(user)): Extension<UserId>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
