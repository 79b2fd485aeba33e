use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{load_lot, require_id, stored_location_of, ServiceContext};
use crate::dto::{LotDto, OutboundLotRequest};
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::{LocationStatus, Lot, Movement};
use crate::repositories::{finish, UnitOfWork};

/// Takes stored lots out of the warehouse network.
#[derive(Debug, Clone)]
pub struct OutboundLotService {
    ctx: ServiceContext,
}

impl OutboundLotService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(lot_id = %request.lot_id))]
    pub async fn outbound(&self, request: OutboundLotRequest) -> Result<LotDto, ServiceError> {
        require_id(request.lot_id, "LotId is required.")?;

        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = self.retrieve(uow.as_ref(), &request, now).await;
        let (lot, from_location_id) = finish(uow, result).await?;

        info!(lot_id = %lot.id, %from_location_id, "lot retrieved");
        self.ctx
            .events
            .publish(Event::LotRetrieved {
                lot_id: lot.id,
                from_location_id,
            })
            .await;
        Ok(LotDto::from(&lot))
    }

    async fn retrieve(
        &self,
        uow: &dyn UnitOfWork,
        request: &OutboundLotRequest,
        now: DateTime<Utc>,
    ) -> Result<(Lot, Uuid), ServiceError> {
        let mut lot = load_lot(uow, request.lot_id).await?;
        let location_id = stored_location_of(&lot, "Lot has no location assigned.")?;

        let mut location = uow.locations().find_by_id(location_id).await?.ok_or_else(|| {
            ServiceError::ValidationError("Location associated to this lot does not exist.".into())
        })?;
        if location.status != LocationStatus::Occupied {
            return Err(ServiceError::ValidationError(
                "Location is not in 'Occupied' status.".into(),
            ));
        }

        lot.retrieve(now)?;
        uow.lots().update(&lot).await?;

        let movement = Movement::outbound(
            lot.id,
            location_id,
            self.ctx.actor.as_uuid(),
            now,
            request.notes.as_deref(),
        )?;
        uow.movements().append(&movement).await?;

        location.set_status(LocationStatus::Available, now);
        uow.locations().update_status(&location).await?;

        Ok((lot, location_id))
    }
}
