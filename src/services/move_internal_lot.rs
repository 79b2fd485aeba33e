use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{available_destination, load_lot, require_id, stored_location_of, ServiceContext};
use crate::dto::{LotDto, MoveInternalLotRequest};
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::{LocationStatus, Lot, Movement};
use crate::repositories::{finish, UnitOfWork};

/// Relocates a stored lot within its warehouse.
#[derive(Debug, Clone)]
pub struct MoveInternalLotService {
    ctx: ServiceContext,
}

impl MoveInternalLotService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(lot_id = %request.lot_id, destination = %request.destination_location_id))]
    pub async fn move_lot(&self, request: MoveInternalLotRequest) -> Result<LotDto, ServiceError> {
        require_id(request.lot_id, "LotId is required.")?;
        require_id(
            request.destination_location_id,
            "DestinationLocationId is required.",
        )?;

        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = self.relocate(uow.as_ref(), &request, now).await;
        let (lot, from_location_id) = finish(uow, result).await?;

        info!(lot_id = %lot.id, %from_location_id, to_location_id = %request.destination_location_id, "lot moved");
        self.ctx
            .events
            .publish(Event::LotMoved {
                lot_id: lot.id,
                from_location_id,
                to_location_id: request.destination_location_id,
            })
            .await;
        Ok(LotDto::from(&lot))
    }

    async fn relocate(
        &self,
        uow: &dyn UnitOfWork,
        request: &MoveInternalLotRequest,
        now: DateTime<Utc>,
    ) -> Result<(Lot, Uuid), ServiceError> {
        let mut lot = load_lot(uow, request.lot_id).await?;
        let source_id = stored_location_of(&lot, "Lot has no source location assigned.")?;

        let mut destination = available_destination(uow, request.destination_location_id).await?;
        let mut source = uow.locations().find_by_id(source_id).await?.ok_or_else(|| {
            ServiceError::ValidationError("Source location does not exist.".into())
        })?;
        if source.warehouse_id != destination.warehouse_id {
            return Err(ServiceError::ValidationError(
                "Source and destination locations must belong to the same warehouse.".into(),
            ));
        }

        lot.move_to(destination.id, now)?;
        uow.lots().update(&lot).await?;

        let movement = Movement::internal_move(
            lot.id,
            source_id,
            destination.id,
            self.ctx.actor.as_uuid(),
            now,
            request.notes.as_deref(),
        )?;
        uow.movements().append(&movement).await?;

        source.set_status(LocationStatus::Available, now);
        uow.locations().update_status(&source).await?;
        destination.set_status(LocationStatus::Occupied, now);
        uow.locations().update_status(&destination).await?;

        Ok((lot, source_id))
    }
}
