use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{require_id, ServiceContext};
use crate::dto::{CreateLocationRequest, LocationDto, UpdateLocationRequest};
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::{Location, LocationStatus};
use crate::repositories::{finish, UnitOfWork};

/// Storage slots. Occupancy itself is only ever changed by the lot services.
#[derive(Debug, Clone)]
pub struct LocationService {
    ctx: ServiceContext,
}

impl LocationService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(warehouse_id = %request.warehouse_id, code = %request.code))]
    pub async fn create(&self, request: CreateLocationRequest) -> Result<LocationDto, ServiceError> {
        require_id(request.warehouse_id, "WarehouseId is required.")?;
        if request.code.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Location code is required.".into(),
            ));
        }

        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result: Result<_, ServiceError> = async {
            if !uow.locations().warehouse_exists(request.warehouse_id).await? {
                return Err(ServiceError::ValidationError(
                    "Warehouse does not exist.".into(),
                ));
            }
            let location =
                Location::create(request.warehouse_id, &request.code, request.label.as_deref(), now)?;
            uow.locations().insert(&location).await?;
            Ok(location)
        }
        .await;
        let location = finish(uow, result).await?;

        info!(location_id = %location.id, "location created");
        Ok(location.into())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<LocationDto>, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = uow.locations().list_all().await;
        let locations = finish(uow, result).await?;
        Ok(locations.into_iter().map(LocationDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, location_id: Uuid) -> Result<LocationDto, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = load(uow.as_ref(), location_id).await;
        Ok(finish(uow, result).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn list_by_warehouse(
        &self,
        warehouse_id: Uuid,
    ) -> Result<Vec<LocationDto>, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = uow.locations().list_by_warehouse(warehouse_id).await;
        let locations = finish(uow, result).await?;
        Ok(locations.into_iter().map(LocationDto::from).collect())
    }

    /// Changes code and label. Status is left alone.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        location_id: Uuid,
        request: UpdateLocationRequest,
    ) -> Result<LocationDto, ServiceError> {
        if request.code.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Location code is required.".into(),
            ));
        }

        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result: Result<_, ServiceError> = async {
            let mut location = load(uow.as_ref(), location_id).await?;
            location.update(&request.code, request.label.as_deref(), now)?;
            uow.locations().update(&location).await?;
            Ok(location)
        }
        .await;
        Ok(finish(uow, result).await?.into())
    }

    /// Puts a free location into maintenance. Already in maintenance is a no-op.
    #[instrument(skip(self))]
    pub async fn disable(&self, location_id: Uuid) -> Result<(), ServiceError> {
        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result: Result<_, ServiceError> = async {
            let mut location = load(uow.as_ref(), location_id).await?;
            match location.status {
                LocationStatus::Maintenance => {
                    debug!(%location_id, "location already in maintenance");
                    Ok(false)
                }
                LocationStatus::Occupied => Err(ServiceError::LocationOccupied(location_id)),
                LocationStatus::Available => {
                    location.disable_to_maintenance(now);
                    uow.locations().update(&location).await?;
                    Ok(true)
                }
            }
        }
        .await;

        if finish(uow, result).await? {
            info!(%location_id, "location disabled");
            self.ctx
                .events
                .publish(Event::LocationDisabled(location_id))
                .await;
        }
        Ok(())
    }
}

async fn load(uow: &dyn UnitOfWork, location_id: Uuid) -> Result<Location, ServiceError> {
    uow.locations()
        .find_by_id(location_id)
        .await?
        .ok_or_else(|| ServiceError::location_not_found(location_id))
}
