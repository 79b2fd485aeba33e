use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceContext;
use crate::dto::{CreateWarehouseRequest, UpdateWarehouseRequest, WarehouseDto};
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::Warehouse;
use crate::repositories::{finish, UnitOfWork};

#[derive(Debug, Clone)]
pub struct WarehouseService {
    ctx: ServiceContext,
}

impl WarehouseService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateWarehouseRequest) -> Result<WarehouseDto, ServiceError> {
        let warehouse = Warehouse::create(&request.name, &request.address, self.ctx.now())?;

        let uow = self.ctx.store.begin().await?;
        let result = uow.warehouses().insert(&warehouse).await;
        finish(uow, result).await?;

        info!(warehouse_id = %warehouse.id, "warehouse created");
        Ok(warehouse.into())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<WarehouseDto>, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = uow.warehouses().list_all().await;
        let warehouses = finish(uow, result).await?;
        Ok(warehouses.into_iter().map(WarehouseDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, warehouse_id: Uuid) -> Result<WarehouseDto, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = load(uow.as_ref(), warehouse_id).await;
        Ok(finish(uow, result).await?.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        warehouse_id: Uuid,
        request: UpdateWarehouseRequest,
    ) -> Result<WarehouseDto, ServiceError> {
        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result: Result<_, ServiceError> = async {
            let mut warehouse = load(uow.as_ref(), warehouse_id).await?;
            warehouse.update(&request.name, &request.address, now)?;
            uow.warehouses().update(&warehouse).await?;
            Ok(warehouse)
        }
        .await;
        Ok(finish(uow, result).await?.into())
    }

    /// Closes the warehouse. Closing twice is a no-op.
    #[instrument(skip(self))]
    pub async fn close(&self, warehouse_id: Uuid) -> Result<(), ServiceError> {
        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result: Result<_, ServiceError> = async {
            let mut warehouse = load(uow.as_ref(), warehouse_id).await?;
            if warehouse.is_closed() {
                debug!(%warehouse_id, "warehouse already closed");
                return Ok(false);
            }
            warehouse.close(now);
            uow.warehouses().update(&warehouse).await?;
            Ok(true)
        }
        .await;

        if finish(uow, result).await? {
            info!(%warehouse_id, "warehouse closed");
            self.ctx
                .events
                .publish(Event::WarehouseClosed(warehouse_id))
                .await;
        }
        Ok(())
    }
}

async fn load(uow: &dyn UnitOfWork, warehouse_id: Uuid) -> Result<Warehouse, ServiceError> {
    uow.warehouses()
        .find_by_id(warehouse_id)
        .await?
        .ok_or_else(|| ServiceError::warehouse_not_found(warehouse_id))
}
