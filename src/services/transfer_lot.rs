use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{available_destination, load_lot, require_id, stored_location_of, ServiceContext};
use crate::dto::{LotDto, TransferDispatchRequest, TransferReceiveRequest};
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::{LocationStatus, Lot, LotStatus, Movement};
use crate::repositories::{finish, UnitOfWork};

/// Moves lots between warehouses in two legs: dispatch, then receive.
///
/// Between the legs the lot is `InTransit` and occupies nothing. The
/// destination chosen at dispatch is only checked, not reserved.
#[derive(Debug, Clone)]
pub struct TransferLotService {
    ctx: ServiceContext,
}

impl TransferLotService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(lot_id = %request.lot_id, destination = %request.destination_location_id))]
    pub async fn dispatch(&self, request: TransferDispatchRequest) -> Result<LotDto, ServiceError> {
        require_id(request.lot_id, "LotId is required.")?;
        require_id(
            request.destination_location_id,
            "DestinationLocationId is required.",
        )?;

        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = self.send_off(uow.as_ref(), &request, now).await;
        let (lot, from_location_id) = finish(uow, result).await?;

        info!(lot_id = %lot.id, %from_location_id, "lot dispatched");
        self.ctx
            .events
            .publish(Event::LotDispatched {
                lot_id: lot.id,
                from_location_id,
                destination_location_id: request.destination_location_id,
            })
            .await;
        Ok(LotDto::from(&lot))
    }

    #[instrument(skip(self, request), fields(lot_id = %request.lot_id, destination = %request.destination_location_id))]
    pub async fn receive(&self, request: TransferReceiveRequest) -> Result<LotDto, ServiceError> {
        require_id(request.lot_id, "LotId is required.")?;
        require_id(
            request.destination_location_id,
            "DestinationLocationId is required.",
        )?;

        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = self.take_in(uow.as_ref(), &request, now).await;
        let lot = finish(uow, result).await?;

        info!(lot_id = %lot.id, location_id = %request.destination_location_id, "lot arrived");
        self.ctx
            .events
            .publish(Event::LotArrived {
                lot_id: lot.id,
                location_id: request.destination_location_id,
            })
            .await;
        Ok(LotDto::from(&lot))
    }

    async fn send_off(
        &self,
        uow: &dyn UnitOfWork,
        request: &TransferDispatchRequest,
        now: DateTime<Utc>,
    ) -> Result<(Lot, Uuid), ServiceError> {
        let mut lot = load_lot(uow, request.lot_id).await?;
        let source_id = stored_location_of(&lot, "Lot has no source location assigned.")?;

        let destination = available_destination(uow, request.destination_location_id).await?;
        let mut source = uow.locations().find_by_id(source_id).await?.ok_or_else(|| {
            ServiceError::ValidationError("Source location does not exist.".into())
        })?;
        if source.warehouse_id == destination.warehouse_id {
            return Err(ServiceError::ValidationError(
                "Source and destination must belong to different warehouses for a transfer."
                    .into(),
            ));
        }

        lot.dispatch(now)?;
        uow.lots().update(&lot).await?;

        let movement = Movement::transfer_dispatch(
            lot.id,
            source_id,
            self.ctx.actor.as_uuid(),
            now,
            request.notes.as_deref(),
        )?;
        uow.movements().append(&movement).await?;

        source.set_status(LocationStatus::Available, now);
        uow.locations().update_status(&source).await?;

        Ok((lot, source_id))
    }

    async fn take_in(
        &self,
        uow: &dyn UnitOfWork,
        request: &TransferReceiveRequest,
        now: DateTime<Utc>,
    ) -> Result<Lot, ServiceError> {
        let mut lot = load_lot(uow, request.lot_id).await?;
        if lot.status != LotStatus::InTransit {
            return Err(ServiceError::ValidationError(format!(
                "Lot is not in 'InTransit' status. Current status: '{}'.",
                lot.status
            )));
        }

        let mut destination = available_destination(uow, request.destination_location_id).await?;

        lot.receive(destination.id, now)?;
        uow.lots().update(&lot).await?;

        let movement = Movement::transfer_receive(
            lot.id,
            destination.id,
            self.ctx.actor.as_uuid(),
            now,
            request.notes.as_deref(),
        )?;
        uow.movements().append(&movement).await?;

        destination.set_status(LocationStatus::Occupied, now);
        uow.locations().update_status(&destination).await?;

        Ok(lot)
    }
}
