use tracing::instrument;
use uuid::Uuid;

use super::ServiceContext;
use crate::dto::MovementDto;
use crate::errors::ServiceError;
use crate::repositories::{finish, UnitOfWork};

/// Read access to the movement ledger.
#[derive(Debug, Clone)]
pub struct MovementQueryService {
    ctx: ServiceContext,
}

impl MovementQueryService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// History of one lot, newest first.
    #[instrument(skip(self))]
    pub async fn by_lot(&self, lot_id: Uuid) -> Result<Vec<MovementDto>, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = history(uow.as_ref(), lot_id).await;
        let movements = finish(uow, result).await?;
        Ok(movements)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, movement_id: Uuid) -> Result<MovementDto, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = uow.movements().find_by_id(movement_id).await;
        finish(uow, result)
            .await?
            .map(MovementDto::from)
            .ok_or_else(|| ServiceError::movement_not_found(movement_id))
    }
}

async fn history(uow: &dyn UnitOfWork, lot_id: Uuid) -> Result<Vec<MovementDto>, ServiceError> {
    if uow.lots().find_by_id(lot_id).await?.is_none() {
        return Err(ServiceError::lot_not_found(lot_id));
    }
    let movements = uow.movements().list_by_lot(lot_id).await?;
    Ok(movements.into_iter().map(MovementDto::from).collect())
}
