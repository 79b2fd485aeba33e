use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{load_lot, ServiceContext};
use crate::dto::{LotDto, UpdateLotRequest};
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::{Lot, LotStatus};
use crate::repositories::{finish, UnitOfWork};

/// Metadata edits and archiving.
#[derive(Debug, Clone)]
pub struct UpdateLotService {
    ctx: ServiceContext,
}

impl UpdateLotService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Replaces reference and description. Frozen while `InTransit` or `Retrieved`.
    #[instrument(skip(self, request), fields(lot_id = %request.lot_id))]
    pub async fn update(&self, request: UpdateLotRequest) -> Result<LotDto, ServiceError> {
        if request.reference.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Lot reference is required.".into(),
            ));
        }

        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = self.apply_update(uow.as_ref(), &request, now).await;
        let lot = finish(uow, result).await?;

        info!(lot_id = %lot.id, "lot metadata updated");
        self.ctx.events.publish(Event::LotUpdated(lot.id)).await;
        Ok(LotDto::from(&lot))
    }

    /// Archives a lot that has left its location. Archiving twice is a no-op.
    #[instrument(skip(self))]
    pub async fn archive(&self, lot_id: Uuid) -> Result<(), ServiceError> {
        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = self.apply_archive(uow.as_ref(), lot_id, now).await;
        let archived = finish(uow, result).await?;

        if archived {
            info!(%lot_id, "lot archived");
            self.ctx.events.publish(Event::LotArchived(lot_id)).await;
        }
        Ok(())
    }

    async fn apply_update(
        &self,
        uow: &dyn UnitOfWork,
        request: &UpdateLotRequest,
        now: DateTime<Utc>,
    ) -> Result<Lot, ServiceError> {
        let mut lot = load_lot(uow, request.lot_id).await?;
        if matches!(lot.status, LotStatus::InTransit | LotStatus::Retrieved) {
            return Err(ServiceError::ValidationError(format!(
                "Cannot update a lot with status '{}'.",
                lot.status.code()
            )));
        }

        lot.update_metadata(&request.reference, request.description.as_deref(), now)?;
        uow.lots().update(&lot).await?;
        Ok(lot)
    }

    /// `Ok(false)` when the lot was already archived and nothing was written.
    async fn apply_archive(
        &self,
        uow: &dyn UnitOfWork,
        lot_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let mut lot = load_lot(uow, lot_id).await?;
        match lot.status {
            LotStatus::Archived => {
                debug!(%lot_id, "lot already archived");
                Ok(false)
            }
            LotStatus::Stored => Err(ServiceError::ValidationError(
                "Cannot archive a lot with status 'STORED'. Retrieve it first.".into(),
            )),
            LotStatus::InTransit | LotStatus::Retrieved => {
                lot.archive(now)?;
                uow.lots().update(&lot).await?;
                Ok(true)
            }
        }
    }
}
