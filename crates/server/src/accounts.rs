//! Accounts and cards API endpoints.

use api_types::account::{AccountNew, AccountView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_account(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state
        .engine
        .accounts()
        .await?
        .into_iter()
        .map(map_account)
        .collect();
    Ok(Json(accounts))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    Ok(Json(map_account(state.engine.account(id).await?)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state.engine.new_account(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(map_account(account))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountNew>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.rename_account(id, &payload.name).await?;
    Ok(Json(map_account(account)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
