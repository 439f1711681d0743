//! Categories API endpoints.

use api_types::{
    CategoryKind,
    category::{CategoryListQuery, CategoryNew, CategoryView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn kind_from_api(kind: CategoryKind) -> engine::CategoryKind {
    match kind {
        CategoryKind::Income => engine::CategoryKind::Income,
        CategoryKind::Expense => engine::CategoryKind::Expense,
    }
}

fn kind_to_api(kind: engine::CategoryKind) -> CategoryKind {
    match kind {
        engine::CategoryKind::Income => CategoryKind::Income,
        engine::CategoryKind::Expense => CategoryKind::Expense,
    }
}

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: kind_to_api(category.kind),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories(query.kind.map(kind_from_api))
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(id).await?;
    Ok(Json(map_category(category)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .new_category(&payload.name, kind_from_api(payload.kind))
        .await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryNew>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(id, &payload.name, kind_from_api(payload.kind))
        .await?;
    Ok(Json(map_category(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
