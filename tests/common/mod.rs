#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use stockpilot::{
    dto::{
        ClientDto, CreateClientRequest, CreateLocationRequest, CreateWarehouseRequest,
        InboundLotRequest, LocationDto, LotDto, WarehouseDto,
    },
    events::{Event, EventSender},
    models::LocationStatus,
    repositories::{InMemoryStore, InventorySnapshot, Store},
    seeding::DemoDataSeeder,
    services::{ActorId, FixedClock, ServiceContext, Services},
};
use tokio::sync::mpsc;
use uuid::Uuid;

pub const OPERATOR: Uuid = Uuid::from_u128(0x0A11_CE00);

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).single().unwrap()
}

/// Services wired to an in-memory store, a frozen clock and a captured
/// event channel.
pub struct TestWorld {
    pub store: InMemoryStore,
    pub clock: Arc<FixedClock>,
    pub ctx: ServiceContext,
    pub services: Services,
    pub seeder: DemoDataSeeder,
    pub events: mpsc::Receiver<Event>,
}

impl TestWorld {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let clock = Arc::new(FixedClock::new(start_time()));
        let (sender, events) = EventSender::channel(1024);
        let ctx = ServiceContext::new(
            Arc::new(store.clone()),
            ActorId::new(OPERATOR).unwrap(),
            clock.clone(),
            sender,
        );
        Self {
            store,
            clock,
            services: Services::new(ctx.clone()),
            seeder: DemoDataSeeder::new(ctx.clone()),
            ctx,
            events,
        }
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        self.store.snapshot()
    }

    /// Panics with every violation found in committed state.
    pub fn assert_occupancy_invariant(&self) {
        let violations = self.store.snapshot().occupancy_violations();
        assert!(
            violations.is_empty(),
            "occupancy invariant broken: {:?}",
            violations
        );
    }

    /// Events published so far, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.clock.advance(chrono::Duration::minutes(minutes));
    }

    /// Overwrites a location's status behind the services' back.
    pub async fn force_location_status(&self, location_id: Uuid, status: LocationStatus) {
        let uow = self.store.begin().await.unwrap();
        let mut location = uow
            .locations()
            .find_by_id(location_id)
            .await
            .unwrap()
            .unwrap();
        location.status = status;
        uow.locations().update_status(&location).await.unwrap();
        uow.commit().await.unwrap();
    }

    /// Points a lot at a location id without touching either location.
    pub async fn force_lot_location(&self, lot_id: Uuid, location_id: Uuid) {
        let uow = self.store.begin().await.unwrap();
        let mut lot = uow.lots().find_by_id(lot_id).await.unwrap().unwrap();
        lot.location_id = Some(location_id);
        uow.lots().update(&lot).await.unwrap();
        uow.commit().await.unwrap();
    }

    pub async fn client(&self, name: &str) -> ClientDto {
        self.services
            .clients
            .create(CreateClientRequest {
                name: name.to_string(),
                contact_email: format!("{}@example.com", name.to_lowercase().replace(' ', "")),
            })
            .await
            .unwrap()
    }

    pub async fn warehouse(&self, name: &str) -> WarehouseDto {
        self.services
            .warehouses
            .create(CreateWarehouseRequest {
                name: name.to_string(),
                address: format!("1 {} Street", name),
            })
            .await
            .unwrap()
    }

    pub async fn location(&self, warehouse_id: Uuid, code: &str) -> LocationDto {
        self.services
            .locations
            .create(CreateLocationRequest {
                warehouse_id,
                code: code.to_string(),
                label: None,
            })
            .await
            .unwrap()
    }

    pub async fn inbound(&self, client_id: Uuid, location_id: Uuid, reference: &str) -> LotDto {
        self.services
            .inbound
            .inbound(InboundLotRequest {
                client_id,
                location_id,
                reference: reference.to_string(),
                description: None,
            })
            .await
            .unwrap()
    }
}

/// Two warehouses with two locations each and one client.
pub struct Layout {
    pub client: ClientDto,
    pub paris: WarehouseDto,
    pub lyon: WarehouseDto,
    pub paris_a1: LocationDto,
    pub paris_a2: LocationDto,
    pub lyon_b1: LocationDto,
    pub lyon_b2: LocationDto,
}

impl Layout {
    pub async fn build(world: &TestWorld) -> Self {
        let client = world.client("Acme").await;
        let paris = world.warehouse("Paris").await;
        let lyon = world.warehouse("Lyon").await;
        Self {
            paris_a1: world.location(paris.id, "A1").await,
            paris_a2: world.location(paris.id, "A2").await,
            lyon_b1: world.location(lyon.id, "B1").await,
            lyon_b2: world.location(lyon.id, "B2").await,
            client,
            paris,
            lyon,
        }
    }
}

pub fn location_status(world: &TestWorld, id: Uuid) -> &'static str {
    world.snapshot().locations[&id].status.code()
}
