use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{
    ClientRepository, LocationRepository, LotDetail, LotFilter, LotRepository, MovementRepository,
    Store, UnitOfWork, WarehouseRepository,
};
use crate::errors::ServiceError;
use crate::invariants::{occupancy_violations, OccupancyViolation};
use crate::models::{Client, Location, Lot, LotStatus, Movement, Warehouse};

/// Full copy of the in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    pub clients: HashMap<Uuid, Client>,
    pub warehouses: HashMap<Uuid, Warehouse>,
    pub locations: HashMap<Uuid, Location>,
    pub lots: HashMap<Uuid, Lot>,
    /// Append order.
    pub movements: Vec<Movement>,
}

impl InventorySnapshot {
    pub fn occupancy_violations(&self) -> Vec<OccupancyViolation> {
        occupancy_violations(self.lots.values(), self.locations.values())
    }

    pub fn movements_for(&self, lot_id: Uuid) -> Vec<&Movement> {
        self.movements.iter().filter(|m| m.lot_id == lot_id).collect()
    }
}

/// Write path that can be made to fail, for exercising rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    LotWrite,
    LocationWrite,
    MovementAppend,
}

/// Store kept entirely in process memory.
///
/// Units of work are serialized: `begin` waits for the previous unit to
/// finish, then works on a private copy that replaces the shared state on
/// commit. Dropping a unit without committing discards its changes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    committed: Arc<Mutex<InventorySnapshot>>,
    gate: Arc<AsyncMutex<()>>,
    writes: Arc<AtomicUsize>,
    fail_point: Arc<Mutex<Option<FailPoint>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of write calls issued through any unit of work so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Committed state as of now.
    pub fn snapshot(&self) -> InventorySnapshot {
        lock(&self.committed).clone()
    }

    /// Makes every subsequent write through `point` fail until cleared.
    pub fn set_fail_point(&self, point: Option<FailPoint>) {
        *lock(&self.fail_point) = point;
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, ServiceError> {
        let gate = self.gate.clone().lock_owned().await;
        let staged = lock(&self.committed).clone();
        Ok(Box::new(InMemoryUnitOfWork {
            staged: Mutex::new(staged),
            committed: self.committed.clone(),
            writes: self.writes.clone(),
            fail_point: *lock(&self.fail_point),
            _gate: gate,
        }))
    }
}

pub struct InMemoryUnitOfWork {
    staged: Mutex<InventorySnapshot>,
    committed: Arc<Mutex<InventorySnapshot>>,
    writes: Arc<AtomicUsize>,
    fail_point: Option<FailPoint>,
    _gate: OwnedMutexGuard<()>,
}

impl InMemoryUnitOfWork {
    fn state(&self) -> MutexGuard<'_, InventorySnapshot> {
        lock(&self.staged)
    }

    fn record_write(&self, point: Option<FailPoint>) -> Result<(), ServiceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if point.is_some() && point == self.fail_point {
            return Err(ServiceError::db_error(format!(
                "injected failure at {:?}",
                point
            )));
        }
        Ok(())
    }
}

fn insert_new<T: Clone>(
    table: &mut HashMap<Uuid, T>,
    id: Uuid,
    value: &T,
) -> Result<(), ServiceError> {
    if table.contains_key(&id) {
        return Err(ServiceError::db_error(format!("duplicate key {}", id)));
    }
    table.insert(id, value.clone());
    Ok(())
}

fn replace_existing<T: Clone>(
    table: &mut HashMap<Uuid, T>,
    id: Uuid,
    value: &T,
) -> Result<(), ServiceError> {
    match table.get_mut(&id) {
        Some(slot) => {
            *slot = value.clone();
            Ok(())
        }
        None => Err(ServiceError::db_error(format!("no row for key {}", id))),
    }
}

#[async_trait]
impl ClientRepository for InMemoryUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError> {
        Ok(self.state().clients.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.state().clients.contains_key(&id))
    }

    async fn list_all(&self) -> Result<Vec<Client>, ServiceError> {
        let mut clients: Vec<Client> = self.state().clients.values().cloned().collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clients)
    }

    async fn insert(&self, client: &Client) -> Result<(), ServiceError> {
        self.record_write(None)?;
        insert_new(&mut self.state().clients, client.id, client)
    }

    async fn update(&self, client: &Client) -> Result<(), ServiceError> {
        self.record_write(None)?;
        replace_existing(&mut self.state().clients, client.id, client)
    }
}

#[async_trait]
impl WarehouseRepository for InMemoryUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Warehouse>, ServiceError> {
        Ok(self.state().warehouses.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.state().warehouses.contains_key(&id))
    }

    async fn list_all(&self) -> Result<Vec<Warehouse>, ServiceError> {
        let mut warehouses: Vec<Warehouse> = self.state().warehouses.values().cloned().collect();
        warehouses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(warehouses)
    }

    async fn insert(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        self.record_write(None)?;
        insert_new(&mut self.state().warehouses, warehouse.id, warehouse)
    }

    async fn update(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        self.record_write(None)?;
        replace_existing(&mut self.state().warehouses, warehouse.id, warehouse)
    }
}

#[async_trait]
impl LocationRepository for InMemoryUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, ServiceError> {
        Ok(self.state().locations.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Location>, ServiceError> {
        let mut locations: Vec<Location> = self.state().locations.values().cloned().collect();
        locations.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(locations)
    }

    async fn list_by_warehouse(&self, warehouse_id: Uuid) -> Result<Vec<Location>, ServiceError> {
        let mut locations: Vec<Location> = self
            .state()
            .locations
            .values()
            .filter(|l| l.warehouse_id == warehouse_id)
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(locations)
    }

    async fn insert(&self, location: &Location) -> Result<(), ServiceError> {
        self.record_write(Some(FailPoint::LocationWrite))?;
        insert_new(&mut self.state().locations, location.id, location)
    }

    async fn update(&self, location: &Location) -> Result<(), ServiceError> {
        self.record_write(Some(FailPoint::LocationWrite))?;
        replace_existing(&mut self.state().locations, location.id, location)
    }

    async fn update_status(&self, location: &Location) -> Result<(), ServiceError> {
        self.record_write(Some(FailPoint::LocationWrite))?;
        let mut state = self.state();
        match state.locations.get_mut(&location.id) {
            Some(stored) => {
                stored.status = location.status;
                stored.updated_at = location.updated_at;
                Ok(())
            }
            None => Err(ServiceError::db_error(format!(
                "no row for key {}",
                location.id
            ))),
        }
    }

    async fn warehouse_exists(&self, warehouse_id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.state().warehouses.contains_key(&warehouse_id))
    }
}

#[async_trait]
impl LotRepository for InMemoryUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lot>, ServiceError> {
        Ok(self.state().lots.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Lot>, ServiceError> {
        let mut lots: Vec<Lot> = self.state().lots.values().cloned().collect();
        lots.sort_by(|a, b| a.reference.cmp(&b.reference));
        Ok(lots)
    }

    async fn insert(&self, lot: &Lot) -> Result<(), ServiceError> {
        self.record_write(Some(FailPoint::LotWrite))?;
        insert_new(&mut self.state().lots, lot.id, lot)
    }

    async fn update(&self, lot: &Lot) -> Result<(), ServiceError> {
        self.record_write(Some(FailPoint::LotWrite))?;
        replace_existing(&mut self.state().lots, lot.id, lot)
    }

    async fn find_details(&self, filter: LotFilter) -> Result<Vec<LotDetail>, ServiceError> {
        let state = self.state();
        let mut details: Vec<LotDetail> = state
            .lots
            .values()
            .filter_map(|lot| {
                let client = state.clients.get(&lot.client_id)?;
                let location = lot.location_id.and_then(|id| state.locations.get(&id));
                let warehouse = location.and_then(|l| state.warehouses.get(&l.warehouse_id));
                Some(LotDetail {
                    id: lot.id,
                    client_id: lot.client_id,
                    client_name: client.name.clone(),
                    location_id: lot.location_id,
                    location_code: location.map(|l| l.code.clone()),
                    warehouse_id: location.map(|l| l.warehouse_id),
                    warehouse_name: warehouse.map(|w| w.name.clone()),
                    reference: lot.reference.clone(),
                    description: lot.description.clone(),
                    status: lot.status,
                    created_at: lot.created_at,
                    updated_at: lot.updated_at,
                })
            })
            .filter(|detail| match filter {
                LotFilter::All => true,
                LotFilter::ById(id) => detail.id == id,
                LotFilter::ByClient(id) => detail.client_id == id,
                LotFilter::ByWarehouse(id) => {
                    detail.status == LotStatus::Stored && detail.warehouse_id == Some(id)
                }
            })
            .collect();
        details.sort_by(|a, b| a.reference.cmp(&b.reference));
        Ok(details)
    }
}

#[async_trait]
impl MovementRepository for InMemoryUnitOfWork {
    async fn append(&self, movement: &Movement) -> Result<(), ServiceError> {
        self.record_write(Some(FailPoint::MovementAppend))?;
        let mut state = self.state();
        if state.movements.iter().any(|m| m.id == movement.id) {
            return Err(ServiceError::db_error(format!(
                "duplicate key {}",
                movement.id
            )));
        }
        state.movements.push(movement.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movement>, ServiceError> {
        Ok(self.state().movements.iter().find(|m| m.id == id).cloned())
    }

    async fn list_by_lot(&self, lot_id: Uuid) -> Result<Vec<Movement>, ServiceError> {
        let mut movements: Vec<Movement> = self
            .state()
            .movements
            .iter()
            .rev()
            .filter(|m| m.lot_id == lot_id)
            .cloned()
            .collect();
        // Stable sort keeps later appends first among equal timestamps.
        movements.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(movements)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
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
        self.record_write(None)?;
        *self.state() = InventorySnapshot::default();
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
        let this = *self;
        let staged = this
            .staged
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *lock(&this.committed) = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ServiceError> {
        Ok(())
    }
}
