//! Goals API endpoints.

use api_types::{
    GoalKind,
    goal::{AmountQuery, GoalNew, GoalProgressView, GoalView},
    transaction::TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{GoalCmd, MoneyCents};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, transactions::map_transaction};

fn kind_to_api(kind: engine::GoalKind) -> GoalKind {
    match kind {
        engine::GoalKind::Savings => GoalKind::Savings,
        engine::GoalKind::Investment => GoalKind::Investment,
        engine::GoalKind::SpendingReduction => GoalKind::SpendingReduction,
        engine::GoalKind::Other => GoalKind::Other,
    }
}

fn kind_from_api(kind: GoalKind) -> engine::GoalKind {
    match kind {
        GoalKind::Savings => engine::GoalKind::Savings,
        GoalKind::Investment => engine::GoalKind::Investment,
        GoalKind::SpendingReduction => engine::GoalKind::SpendingReduction,
        GoalKind::Other => engine::GoalKind::Other,
    }
}

fn map_goal(goal: engine::Goal) -> GoalView {
    GoalView {
        id: goal.id,
        description: goal.description,
        kind: kind_to_api(goal.kind),
        target_minor: goal.target_minor,
        month: goal.month,
        year: goal.year,
        category_id: goal.category_id,
        responsible_id: goal.responsible_id,
        active: goal.active,
    }
}

fn cmd_from_payload(payload: GoalNew) -> GoalCmd {
    GoalCmd {
        description: payload.description,
        kind: kind_from_api(payload.kind),
        target_minor: payload.target_minor,
        month: payload.month,
        year: payload.year,
        category_id: payload.category_id,
        responsible_id: payload.responsible_id,
        active: payload.active,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<GoalView>>, ServerError> {
    let goals = state
        .engine
        .goals()
        .await?
        .into_iter()
        .map(map_goal)
        .collect();
    Ok(Json(goals))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GoalView>, ServerError> {
    Ok(Json(map_goal(state.engine.goal(id).await?)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state.engine.new_goal(cmd_from_payload(payload)).await?;
    Ok((StatusCode::CREATED, Json(map_goal(goal))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalNew>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state
        .engine
        .update_goal(id, cmd_from_payload(payload))
        .await?;
    Ok(Json(map_goal(goal)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn progress(
    State(state): State<ServerState>,
) -> Result<Json<Vec<GoalProgressView>>, ServerError> {
    let progress = state
        .engine
        .goal_progress()
        .await?
        .into_iter()
        .map(|progress| GoalProgressView {
            goal: map_goal(progress.goal),
            achieved_minor: progress.achieved_minor,
            percent: progress.percent,
        })
        .collect();
    Ok(Json(progress))
}

pub async fn contribute(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AmountQuery>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let amount: MoneyCents = query.amount.parse()?;
    let tx = state.engine.contribute_to_goal(id, amount).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn withdraw(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AmountQuery>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let amount: MoneyCents = query.amount.parse()?;
    let tx = state.engine.withdraw_from_goal(id, amount).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}
