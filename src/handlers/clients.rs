use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::AppState;
use crate::dto::{ClientDto, CreateClientRequest, UpdateClientRequest};
use crate::errors::ServiceError;

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientDto>), ServiceError> {
    let client = state.services.clients.create(request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ClientDto>>, ServiceError> {
    Ok(Json(state.services.clients.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientDto>, ServiceError> {
    Ok(Json(state.services.clients.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientDto>, ServiceError> {
    Ok(Json(state.services.clients.update(id, request).await?))
}

pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.clients.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
