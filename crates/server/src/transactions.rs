//! Transactions API endpoints

use api_types::{
    Grouping, TransactionKind as ApiKind,
    transaction::{TransactionGroupQuery, TransactionListQuery, TransactionNew, TransactionView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{GroupDimension, TransactionCmd, TransactionListFilter};
use uuid::Uuid;

use crate::{ServerError, period_or_current, server::ServerState};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::GoalTransfer => ApiKind::GoalTransfer,
        engine::TransactionKind::GoalWithdrawal => ApiKind::GoalWithdrawal,
    }
}

fn kind_from_api(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::GoalTransfer => engine::TransactionKind::GoalTransfer,
        ApiKind::GoalWithdrawal => engine::TransactionKind::GoalWithdrawal,
    }
}

pub(crate) fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        date: tx.date,
        kind: map_kind(tx.kind),
        category_id: tx.category_id,
        account_id: tx.account_id,
        responsible_id: tx.responsible_id,
        description: tx.description,
        amount_minor: tx.amount_minor,
        recurring: tx.recurring,
        recurrence_end: tx.recurrence_end,
        installments: tx.installments,
        installments_remaining: tx.installments_remaining,
        goal_id: tx.goal_id,
    }
}

pub(crate) fn map_grouping(grouping: engine::Grouping) -> Grouping {
    Grouping {
        name: grouping.name,
        total_minor: grouping.total_minor,
    }
}

pub(crate) fn list_filter(query: TransactionListQuery) -> TransactionListFilter {
    TransactionListFilter {
        year: query.year,
        month: query.month,
        kind: query.kind.map(kind_from_api),
        category_id: query.category_id,
        responsible_id: query.responsible_id,
        account_id: query.account_id,
    }
}

fn cmd_from_payload(payload: TransactionNew) -> TransactionCmd {
    TransactionCmd {
        kind: kind_from_api(payload.kind),
        date: payload.date,
        amount_minor: payload.amount_minor,
        category_id: payload.category_id,
        account_id: payload.account_id,
        responsible_id: payload.responsible_id,
        description: payload.description,
        recurring: payload.recurring,
        recurrence_end: payload.recurrence_end,
        installments: payload.installments,
        installments_remaining: payload.installments_remaining,
        goal_id: payload.goal_id,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state
        .engine
        .transactions(&list_filter(query))
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(transactions))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    Ok(Json(map_transaction(state.engine.transaction(id).await?)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state.engine.new_transaction(cmd_from_payload(payload)).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionNew>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(id, cmd_from_payload(payload))
        .await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /transactions/groups/{dimension}`: month totals per category,
/// responsible or account.
pub async fn groups(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Query(query): Query<TransactionGroupQuery>,
) -> Result<Json<Vec<Grouping>>, ServerError> {
    let dimension = GroupDimension::try_from(name.as_str())
        .map_err(|_| ServerError::Generic(format!("unknown grouping dimension: {name}")))?;
    let kind = query.kind.map_or(engine::TransactionKind::Expense, kind_from_api);
    let period = period_or_current(query.year, query.month)?;
    let groups = state
        .engine
        .group_transactions(dimension, kind, Some(period))
        .await?
        .into_iter()
        .map(map_grouping)
        .collect();
    Ok(Json(groups))
}
