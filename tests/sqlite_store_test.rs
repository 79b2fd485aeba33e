//! Runs the lot lifecycle against the sea-orm store on a throwaway SQLite file.

use std::sync::Arc;

use assert_matches::assert_matches;
use stockpilot::{
    db::{self, DbConfig},
    dto::{
        CreateClientRequest, CreateLocationRequest, CreateWarehouseRequest, InboundLotRequest,
        MoveInternalLotRequest, OutboundLotRequest, TransferDispatchRequest,
        TransferReceiveRequest,
    },
    errors::ServiceError,
    events::EventSender,
    repositories::SeaOrmStore,
    seeding::DemoDataSeeder,
    services::{ActorId, ServiceContext, Services, SystemClock},
};
use tempfile::TempDir;
use uuid::Uuid;

struct SqliteWorld {
    services: Services,
    seeder: DemoDataSeeder,
    _dir: TempDir,
}

async fn sqlite_world() -> SqliteWorld {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stockpilot.db");
    let config = DbConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 1,
        min_connections: 1,
        ..DbConfig::default()
    };
    let pool = db::establish_connection(&config).await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    let (events, mut rx) = EventSender::channel(64);
    tokio::spawn(async move { while rx.recv().await.is_some() {} });

    let ctx = ServiceContext::new(
        Arc::new(SeaOrmStore::new(Arc::new(pool))),
        ActorId::system_operator(),
        Arc::new(SystemClock),
        events,
    );
    SqliteWorld {
        services: Services::new(ctx.clone()),
        seeder: DemoDataSeeder::new(ctx),
        _dir: dir,
    }
}

#[tokio::test]
async fn lifecycle_round_trips_through_sqlite() {
    let world = sqlite_world().await;
    let services = &world.services;

    let client = services
        .clients
        .create(CreateClientRequest {
            name: "Acme".into(),
            contact_email: "ops@acme.com".into(),
        })
        .await
        .unwrap();
    let paris = services
        .warehouses
        .create(CreateWarehouseRequest {
            name: "Paris".into(),
            address: "1 Rue".into(),
        })
        .await
        .unwrap();
    let lyon = services
        .warehouses
        .create(CreateWarehouseRequest {
            name: "Lyon".into(),
            address: "2 Rue".into(),
        })
        .await
        .unwrap();
    let mut ids = Vec::new();
    for (warehouse_id, code) in [(paris.id, "A1"), (paris.id, "A2"), (lyon.id, "B1")] {
        let location = services
            .locations
            .create(CreateLocationRequest {
                warehouse_id,
                code: code.into(),
                label: None,
            })
            .await
            .unwrap();
        ids.push(location.id);
    }
    let (a1, a2, b1) = (ids[0], ids[1], ids[2]);

    let lot = services
        .inbound
        .inbound(InboundLotRequest {
            client_id: client.id,
            location_id: a1,
            reference: "LOT-001".into(),
            description: Some("Pallet".into()),
        })
        .await
        .unwrap();
    assert_eq!(services.locations.get(a1).await.unwrap().status, "OCCUPIED");

    services
        .move_internal
        .move_lot(MoveInternalLotRequest {
            lot_id: lot.id,
            destination_location_id: a2,
            notes: None,
        })
        .await
        .unwrap();
    services
        .transfer
        .dispatch(TransferDispatchRequest {
            lot_id: lot.id,
            destination_location_id: b1,
            notes: None,
        })
        .await
        .unwrap();
    let received = services
        .transfer
        .receive(TransferReceiveRequest {
            lot_id: lot.id,
            destination_location_id: b1,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(received.location_id, b1);

    let detail = services.lot_query.get(lot.id).await.unwrap();
    assert_eq!(detail.warehouse_name.as_deref(), Some("Lyon"));
    assert_eq!(detail.location_code.as_deref(), Some("B1"));
    assert_eq!(
        services.lot_query.by_warehouse(lyon.id).await.unwrap().len(),
        1
    );

    services
        .outbound
        .outbound(OutboundLotRequest {
            lot_id: lot.id,
            notes: None,
        })
        .await
        .unwrap();
    services.update_lot.archive(lot.id).await.unwrap();
    services.update_lot.archive(lot.id).await.unwrap();

    let history = services.movement_query.by_lot(lot.id).await.unwrap();
    assert_eq!(history.len(), 5);
    assert!(history
        .iter()
        .all(|m| m.performed_by == ActorId::system_operator().as_uuid()));
    for id in [a1, a2, b1] {
        assert_eq!(services.locations.get(id).await.unwrap().status, "AVAILABLE");
    }
    assert_eq!(
        services.lot_query.get(lot.id).await.unwrap().status,
        "ARCHIVED"
    );
}

#[tokio::test]
async fn failed_precondition_leaves_sqlite_untouched() {
    let world = sqlite_world().await;
    world.seeder.seed().await.unwrap();
    let lots = world.services.lot_query.list().await.unwrap();

    let err = world
        .services
        .inbound
        .inbound(InboundLotRequest {
            client_id: lots[0].client_id,
            location_id: lots[0].location_id,
            reference: "LOT-X".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
    assert_eq!(world.services.lot_query.list().await.unwrap().len(), 3);

    assert_matches!(
        world.services.clients.get(Uuid::new_v4()).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn reset_and_seed_on_sqlite() {
    let world = sqlite_world().await;
    world.seeder.seed().await.unwrap();
    let summary = world.seeder.reset_and_seed().await.unwrap();
    assert_eq!(summary.locations, 7);
    assert_eq!(world.services.clients.list().await.unwrap().len(), 2);
    let first = world.services.lot_query.list().await.unwrap()[0].id;
    let history = world.services.movement_query.by_lot(first).await.unwrap();
    assert_eq!(history.len(), 1);
}
