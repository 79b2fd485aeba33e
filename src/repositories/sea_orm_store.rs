use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
    Unchanged,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::{
    ClientRepository, LocationRepository, LotDetail, LotFilter, LotRepository, MovementRepository,
    Store, UnitOfWork, WarehouseRepository,
};
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::models::{
    client, location, lot, movement, warehouse, Client, Location, Lot, LotStatus, Movement,
    Warehouse,
};

/// Relational store. Every unit of work is one database transaction.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: Arc<DbPool>,
}

impl SeaOrmStore {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl Store for SeaOrmStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        Ok(Box::new(SeaOrmUnitOfWork { txn }))
    }
}

/// Repositories bound to one open transaction. Dropping it without
/// committing rolls the transaction back.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

fn client_row(client: &Client) -> client::ActiveModel {
    client::ActiveModel {
        id: Set(client.id),
        name: Set(client.name.clone()),
        contact_email: Set(client.contact_email.clone()),
        status: Set(client.status),
        created_at: Set(client.created_at),
        updated_at: Set(client.updated_at),
    }
}

fn warehouse_row(warehouse: &Warehouse) -> warehouse::ActiveModel {
    warehouse::ActiveModel {
        id: Set(warehouse.id),
        name: Set(warehouse.name.clone()),
        address: Set(warehouse.address.clone()),
        status: Set(warehouse.status),
        created_at: Set(warehouse.created_at),
        updated_at: Set(warehouse.updated_at),
    }
}

fn location_row(location: &Location) -> location::ActiveModel {
    location::ActiveModel {
        id: Set(location.id),
        warehouse_id: Set(location.warehouse_id),
        code: Set(location.code.clone()),
        label: Set(location.label.clone()),
        status: Set(location.status),
        created_at: Set(location.created_at),
        updated_at: Set(location.updated_at),
    }
}

fn lot_row(lot: &Lot) -> lot::ActiveModel {
    lot::ActiveModel {
        id: Set(lot.id),
        client_id: Set(lot.client_id),
        location_id: Set(lot.location_id),
        reference: Set(lot.reference.clone()),
        description: Set(lot.description.clone()),
        status: Set(lot.status),
        created_at: Set(lot.created_at),
        updated_at: Set(lot.updated_at),
    }
}

fn movement_row(movement: &Movement) -> movement::ActiveModel {
    movement::ActiveModel {
        id: Set(movement.id),
        lot_id: Set(movement.lot_id),
        movement_type: Set(movement.movement_type),
        from_location_id: Set(movement.from_location_id),
        to_location_id: Set(movement.to_location_id),
        occurred_at: Set(movement.occurred_at),
        performed_by: Set(movement.performed_by),
        reason: Set(movement.reason.clone()),
    }
}

#[async_trait]
impl ClientRepository for SeaOrmUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError> {
        Ok(client::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        let count = client::Entity::find_by_id(id).count(&self.txn).await?;
        Ok(count > 0)
    }

    async fn list_all(&self) -> Result<Vec<Client>, ServiceError> {
        Ok(client::Entity::find()
            .order_by_asc(client::Column::Name)
            .all(&self.txn)
            .await?)
    }

    async fn insert(&self, client: &Client) -> Result<(), ServiceError> {
        client_row(client).insert(&self.txn).await?;
        Ok(())
    }

    async fn update(&self, client: &Client) -> Result<(), ServiceError> {
        client_row(client).update(&self.txn).await?;
        Ok(())
    }
}

#[async_trait]
impl WarehouseRepository for SeaOrmUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Warehouse>, ServiceError> {
        Ok(warehouse::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        let count = warehouse::Entity::find_by_id(id).count(&self.txn).await?;
        Ok(count > 0)
    }

    async fn list_all(&self) -> Result<Vec<Warehouse>, ServiceError> {
        Ok(warehouse::Entity::find()
            .order_by_asc(warehouse::Column::Name)
            .all(&self.txn)
            .await?)
    }

    async fn insert(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        warehouse_row(warehouse).insert(&self.txn).await?;
        Ok(())
    }

    async fn update(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        warehouse_row(warehouse).update(&self.txn).await?;
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for SeaOrmUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, ServiceError> {
        Ok(location::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn list_all(&self) -> Result<Vec<Location>, ServiceError> {
        Ok(location::Entity::find()
            .order_by_asc(location::Column::Code)
            .all(&self.txn)
            .await?)
    }

    async fn list_by_warehouse(&self, warehouse_id: Uuid) -> Result<Vec<Location>, ServiceError> {
        Ok(location::Entity::find()
            .filter(location::Column::WarehouseId.eq(warehouse_id))
            .order_by_asc(location::Column::Code)
            .all(&self.txn)
            .await?)
    }

    async fn insert(&self, location: &Location) -> Result<(), ServiceError> {
        location_row(location).insert(&self.txn).await?;
        Ok(())
    }

    async fn update(&self, location: &Location) -> Result<(), ServiceError> {
        location_row(location).update(&self.txn).await?;
        Ok(())
    }

    async fn update_status(&self, location: &Location) -> Result<(), ServiceError> {
        debug!(location_id = %location.id, status = %location.status, "updating location status");
        location::ActiveModel {
            id: Unchanged(location.id),
            status: Set(location.status),
            updated_at: Set(location.updated_at),
            ..Default::default()
        }
        .update(&self.txn)
        .await?;
        Ok(())
    }

    async fn warehouse_exists(&self, warehouse_id: Uuid) -> Result<bool, ServiceError> {
        WarehouseRepository::exists(self, warehouse_id).await
    }
}

#[async_trait]
impl LotRepository for SeaOrmUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lot>, ServiceError> {
        Ok(lot::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn list_all(&self) -> Result<Vec<Lot>, ServiceError> {
        Ok(lot::Entity::find()
            .order_by_asc(lot::Column::Reference)
            .all(&self.txn)
            .await?)
    }

    async fn insert(&self, lot: &Lot) -> Result<(), ServiceError> {
        lot_row(lot).insert(&self.txn).await?;
        Ok(())
    }

    async fn update(&self, lot: &Lot) -> Result<(), ServiceError> {
        lot_row(lot).update(&self.txn).await?;
        Ok(())
    }

    async fn find_details(&self, filter: LotFilter) -> Result<Vec<LotDetail>, ServiceError> {
        let mut query = lot::Entity::find()
            .select_only()
            .column(lot::Column::Id)
            .column(lot::Column::ClientId)
            .column_as(client::Column::Name, "client_name")
            .column(lot::Column::LocationId)
            .column_as(location::Column::Code, "location_code")
            .column_as(location::Column::WarehouseId, "warehouse_id")
            .column_as(warehouse::Column::Name, "warehouse_name")
            .column(lot::Column::Reference)
            .column(lot::Column::Description)
            .column(lot::Column::Status)
            .column(lot::Column::CreatedAt)
            .column(lot::Column::UpdatedAt)
            .join(JoinType::InnerJoin, lot::Relation::Client.def())
            .join(JoinType::LeftJoin, lot::Relation::Location.def())
            .join(JoinType::LeftJoin, location::Relation::Warehouse.def());

        query = match filter {
            LotFilter::All => query,
            LotFilter::ById(id) => query.filter(lot::Column::Id.eq(id)),
            LotFilter::ByClient(id) => query.filter(lot::Column::ClientId.eq(id)),
            LotFilter::ByWarehouse(id) => query
                .filter(location::Column::WarehouseId.eq(id))
                .filter(lot::Column::Status.eq(LotStatus::Stored)),
        };

        Ok(query
            .order_by_asc(lot::Column::Reference)
            .into_model::<LotDetail>()
            .all(&self.txn)
            .await?)
    }
}

#[async_trait]
impl MovementRepository for SeaOrmUnitOfWork {
    async fn append(&self, movement: &Movement) -> Result<(), ServiceError> {
        movement_row(movement).insert(&self.txn).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movement>, ServiceError> {
        Ok(movement::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn list_by_lot(&self, lot_id: Uuid) -> Result<Vec<Movement>, ServiceError> {
        Ok(movement::Entity::find()
            .filter(movement::Column::LotId.eq(lot_id))
            .order_by_desc(movement::Column::OccurredAt)
            .all(&self.txn)
            .await?)
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn clients(&self) -> &dyn ClientRepository {
        self
    }

    fn warehouses(&self) -> &dyn WarehouseRepository {
        self
    }

    fn locations(&self) -> &dyn LocationRepository {
        self
    }

    fn lots(&self) -> &dyn LotRepository {
        self
    }

    fn movements(&self) -> &dyn MovementRepository {
        self
    }

    async fn purge_all(&self) -> Result<(), ServiceError> {
        movement::Entity::delete_many().exec(&self.txn).await?;
        lot::Entity::delete_many().exec(&self.txn).await?;
        location::Entity::delete_many().exec(&self.txn).await?;
        warehouse::Entity::delete_many().exec(&self.txn).await?;
        client::Entity::delete_many().exec(&self.txn).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
        self.txn.commit().await.map_err(ServiceError::db_error)
    }

    async fn rollback(self: Box<Self>) -> Result<(), ServiceError> {
        self.txn.rollback().await.map_err(ServiceError::db_error)
    }
}
