use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use super::{require_id, ServiceContext};
use crate::dto::{InboundLotRequest, LotDto};
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::{LocationStatus, Lot, Movement};
use crate::repositories::{finish, UnitOfWork};

/// Places new lots into available locations.
#[derive(Debug, Clone)]
pub struct InboundLotService {
    ctx: ServiceContext,
}

impl InboundLotService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(client_id = %request.client_id, location_id = %request.location_id))]
    pub async fn inbound(&self, request: InboundLotRequest) -> Result<LotDto, ServiceError> {
        require_id(request.client_id, "ClientId is required.")?;
        require_id(request.location_id, "LocationId is required.")?;
        if request.reference.trim().is_empty() {
            return Err(ServiceError::ValidationError("Reference is required.".into()));
        }

        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = self.place(uow.as_ref(), &request, now).await;
        let lot = finish(uow, result).await?;

        info!(lot_id = %lot.id, reference = %lot.reference, "lot received");
        self.ctx
            .events
            .publish(Event::LotReceived {
                lot_id: lot.id,
                location_id: request.location_id,
            })
            .await;
        Ok(LotDto::from(&lot))
    }

    async fn place(
        &self,
        uow: &dyn UnitOfWork,
        request: &InboundLotRequest,
        now: DateTime<Utc>,
    ) -> Result<Lot, ServiceError> {
        if !uow.clients().exists(request.client_id).await? {
            return Err(ServiceError::ValidationError("Client does not exist.".into()));
        }

        let mut location = uow
            .locations()
            .find_by_id(request.location_id)
            .await?
            .ok_or_else(|| ServiceError::ValidationError("Location does not exist.".into()))?;
        if !location.is_available() {
            return Err(ServiceError::ValidationError(
                "Location is not available.".into(),
            ));
        }

        let lot = Lot::create_inbound(
            request.client_id,
            request.location_id,
            &request.reference,
            request.description.as_deref(),
            now,
        )?;
        uow.lots().insert(&lot).await?;

        let movement = Movement::inbound(lot.id, location.id, self.ctx.actor.as_uuid(), now, None)?;
        uow.movements().append(&movement).await?;

        location.set_status(LocationStatus::Occupied, now);
        uow.locations().update_status(&location).await?;

        Ok(lot)
    }
}
