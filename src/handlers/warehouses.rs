use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::AppState;
use crate::dto::{CreateWarehouseRequest, UpdateWarehouseRequest, WarehouseDto};
use crate::errors::ServiceError;

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<WarehouseDto>), ServiceError> {
    let warehouse = state.services.warehouses.create(request).await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<WarehouseDto>>, ServiceError> {
    Ok(Json(state.services.warehouses.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WarehouseDto>, ServiceError> {
    Ok(Json(state.services.warehouses.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWarehouseRequest>,
) -> Result<Json<WarehouseDto>, ServiceError> {
    Ok(Json(state.services.warehouses.update(id, request).await?))
}

pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.warehouses.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
