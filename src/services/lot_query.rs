use tracing::instrument;
use uuid::Uuid;

use super::ServiceContext;
use crate::dto::LotDetailDto;
use crate::errors::ServiceError;
use crate::repositories::{finish, LotFilter};

/// Read side for lot listings, ordered by reference.
#[derive(Debug, Clone)]
pub struct LotQueryService {
    ctx: ServiceContext,
}

impl LotQueryService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    async fn details(&self, filter: LotFilter) -> Result<Vec<LotDetailDto>, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = uow.lots().find_details(filter).await;
        let details = finish(uow, result).await?;
        Ok(details.into_iter().map(LotDetailDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<LotDetailDto>, ServiceError> {
        self.details(LotFilter::All).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, lot_id: Uuid) -> Result<LotDetailDto, ServiceError> {
        if lot_id.is_nil() {
            return Err(ServiceError::lot_not_found(lot_id));
        }
        self.details(LotFilter::ById(lot_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::lot_not_found(lot_id))
    }

    #[instrument(skip(self))]
    pub async fn by_client(&self, client_id: Uuid) -> Result<Vec<LotDetailDto>, ServiceError> {
        self.details(LotFilter::ByClient(client_id)).await
    }

    /// Lots currently stored somewhere in the warehouse.
    #[instrument(skip(self))]
    pub async fn by_warehouse(
        &self,
        warehouse_id: Uuid,
    ) -> Result<Vec<LotDetailDto>, ServiceError> {
        self.details(LotFilter::ByWarehouse(warehouse_id)).await
    }
}
