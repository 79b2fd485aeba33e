use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::AppState;
use crate::dto::MovementDto;
use crate::errors::ServiceError;

pub async fn by_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> Result<Json<Vec<MovementDto>>, ServiceError> {
    Ok(Json(state.services.movement_query.by_lot(lot_id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MovementDto>, ServiceError> {
    Ok(Json(state.services.movement_query.get(id).await?))
}
