//! Repository contracts and the scoped transaction that binds them together.
//!
//! Services never talk to a connection directly. They open a [`UnitOfWork`]
//! from a [`Store`], use the repositories it hands out, and settle it with
//! [`finish`], which commits on success and rolls back on failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{Client, Location, Lot, LotStatus, Movement, Warehouse};

pub mod in_memory;
pub mod sea_orm_store;

pub use in_memory::{InMemoryStore, InventorySnapshot};
pub use sea_orm_store::SeaOrmStore;

/// Lot joined with the client, location and warehouse it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct LotDetail {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub location_id: Option<Uuid>,
    pub location_code: Option<String>,
    pub warehouse_id: Option<Uuid>,
    pub warehouse_name: Option<String>,
    pub reference: String,
    pub description: Option<String>,
    pub status: LotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Selection applied to lot detail projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotFilter {
    All,
    ById(Uuid),
    ByClient(Uuid),
    /// Lots currently stored in one of the warehouse's locations.
    ByWarehouse(Uuid),
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError>;
    async fn exists(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn list_all(&self) -> Result<Vec<Client>, ServiceError>;
    async fn insert(&self, client: &Client) -> Result<(), ServiceError>;
    async fn update(&self, client: &Client) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Warehouse>, ServiceError>;
    async fn exists(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn list_all(&self) -> Result<Vec<Warehouse>, ServiceError>;
    async fn insert(&self, warehouse: &Warehouse) -> Result<(), ServiceError>;
    async fn update(&self, warehouse: &Warehouse) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, ServiceError>;
    async fn list_all(&self) -> Result<Vec<Location>, ServiceError>;
    async fn list_by_warehouse(&self, warehouse_id: Uuid) -> Result<Vec<Location>, ServiceError>;
    async fn insert(&self, location: &Location) -> Result<(), ServiceError>;
    async fn update(&self, location: &Location) -> Result<(), ServiceError>;
    /// Persists only the occupancy status and timestamp of `location`.
    async fn update_status(&self, location: &Location) -> Result<(), ServiceError>;
    async fn warehouse_exists(&self, warehouse_id: Uuid) -> Result<bool, ServiceError>;
}

#[async_trait]
pub trait LotRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lot>, ServiceError>;
    async fn list_all(&self) -> Result<Vec<Lot>, ServiceError>;
    async fn insert(&self, lot: &Lot) -> Result<(), ServiceError>;
    async fn update(&self, lot: &Lot) -> Result<(), ServiceError>;
    /// Detail projections ordered by reference.
    async fn find_details(&self, filter: LotFilter) -> Result<Vec<LotDetail>, ServiceError>;
}

/// Append-only movement ledger.
#[async_trait]
pub trait MovementRepository: Send + Sync {
    async fn append(&self, movement: &Movement) -> Result<(), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movement>, ServiceError>;
    /// Newest first.
    async fn list_by_lot(&self, lot_id: Uuid) -> Result<Vec<Movement>, ServiceError>;
}

/// One atomic scope over all repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn clients(&self) -> &dyn ClientRepository;
    fn warehouses(&self) -> &dyn WarehouseRepository;
    fn locations(&self) -> &dyn LocationRepository;
    fn lots(&self) -> &dyn LotRepository;
    fn movements(&self) -> &dyn MovementRepository;

    /// Deletes every record. Used by the development reset endpoint only.
    async fn purge_all(&self) -> Result<(), ServiceError>;

    async fn commit(self: Box<Self>) -> Result<(), ServiceError>;
    async fn rollback(self: Box<Self>) -> Result<(), ServiceError>;
}

/// Source of units of work.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, ServiceError>;
}

/// Settles a unit of work: commit when `result` is `Ok`, roll back otherwise.
///
/// A failed rollback is logged and the original error is returned.
pub async fn finish<T>(
    uow: Box<dyn UnitOfWork>,
    result: Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "rollback failed after: {}", err);
            }
            Err(err)
        }
    }
}
