use api_types::responsible::{ResponsibleNew, ResponsibleView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_responsible(responsible: engine::Responsible) -> ResponsibleView {
    ResponsibleView {
        id: responsible.id,
        name: responsible.name,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ResponsibleView>>, ServerError> {
    let responsibles = state
        .engine
        .responsibles()
        .await?
        .into_iter()
        .map(map_responsible)
        .collect();
    Ok(Json(responsibles))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResponsibleView>, ServerError> {
    Ok(Json(map_responsible(state.engine.responsible(id).await?)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ResponsibleNew>,
) -> Result<(StatusCode, Json<ResponsibleView>), ServerError> {
    let responsible = state.engine.new_responsible(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(map_responsible(responsible))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResponsibleNew>,
) -> Result<Json<ResponsibleView>, ServerError> {
    let responsible = state.engine.rename_responsible(id, &payload.name).await?;
    Ok(Json(map_responsible(responsible)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_responsible(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
