use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::AppState;
use crate::dto::{
    InboundLotRequest, LotDetailDto, LotDto, MoveInternalLotRequest, OutboundLotRequest,
    TransferDispatchRequest, TransferReceiveRequest, UpdateLotRequest,
};
use crate::errors::ServiceError;

pub async fn inbound(
    State(state): State<AppState>,
    Json(request): Json<InboundLotRequest>,
) -> Result<(StatusCode, Json<LotDto>), ServiceError> {
    let lot = state.services.inbound.inbound(request).await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

pub async fn outbound(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<OutboundLotRequest>>,
) -> Result<Json<LotDto>, ServiceError> {
    let mut request = body.map(|Json(request)| request).unwrap_or_default();
    request.lot_id = id;
    Ok(Json(state.services.outbound.outbound(request).await?))
}

pub async fn move_internal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut request): Json<MoveInternalLotRequest>,
) -> Result<Json<LotDto>, ServiceError> {
    request.lot_id = id;
    Ok(Json(state.services.move_internal.move_lot(request).await?))
}

pub async fn dispatch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut request): Json<TransferDispatchRequest>,
) -> Result<Json<LotDto>, ServiceError> {
    request.lot_id = id;
    Ok(Json(state.services.transfer.dispatch(request).await?))
}

pub async fn receive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut request): Json<TransferReceiveRequest>,
) -> Result<Json<LotDto>, ServiceError> {
    request.lot_id = id;
    Ok(Json(state.services.transfer.receive(request).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut request): Json<UpdateLotRequest>,
) -> Result<Json<LotDto>, ServiceError> {
    request.lot_id = id;
    Ok(Json(state.services.update_lot.update(request).await?))
}

pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.update_lot.archive(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<LotDetailDto>>, ServiceError> {
    Ok(Json(state.services.lot_query.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LotDetailDto>, ServiceError> {
    Ok(Json(state.services.lot_query.get(id).await?))
}

pub async fn by_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<LotDetailDto>>, ServiceError> {
    Ok(Json(state.services.lot_query.by_client(client_id).await?))
}

pub async fn by_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<Uuid>,
) -> Result<Json<Vec<LotDetailDto>>, ServiceError> {
    Ok(Json(
        state.services.lot_query.by_warehouse(warehouse_id).await?,
    ))
}
