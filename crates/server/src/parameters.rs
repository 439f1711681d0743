//! Key/value settings API endpoints.

use api_types::parameter::{ParameterSet, ParameterView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_parameter(parameter: engine::Parameter) -> ParameterView {
    ParameterView {
        key: parameter.key,
        value: parameter.value,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ParameterView>>, ServerError> {
    let parameters = state
        .engine
        .parameters()
        .await?
        .into_iter()
        .map(map_parameter)
        .collect();
    Ok(Json(parameters))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Result<Json<ParameterView>, ServerError> {
    Ok(Json(map_parameter(state.engine.parameter(&key).await?)))
}

/// Create or overwrite `key`.
pub async fn set(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    Json(payload): Json<ParameterSet>,
) -> Result<Json<ParameterView>, ServerError> {
    let parameter = state.engine.set_parameter(&key, &payload.value).await?;
    Ok(Json(map_parameter(parameter)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_parameter(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
