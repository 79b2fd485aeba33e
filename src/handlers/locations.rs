use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::AppState;
use crate::dto::{CreateLocationRequest, LocationDto, UpdateLocationRequest};
use crate::errors::ServiceError;

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<LocationDto>), ServiceError> {
    let location = state.services.locations.create(request).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<LocationDto>>, ServiceError> {
    Ok(Json(state.services.locations.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LocationDto>, ServiceError> {
    Ok(Json(state.services.locations.get(id).await?))
}

pub async fn by_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<Uuid>,
) -> Result<Json<Vec<LocationDto>>, ServiceError> {
    Ok(Json(
        state.services.locations.list_by_warehouse(warehouse_id).await?,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<LocationDto>, ServiceError> {
    Ok(Json(state.services.locations.update(id, request).await?))
}

/// 409 while a lot occupies the location.
pub async fn disable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.locations.disable(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
