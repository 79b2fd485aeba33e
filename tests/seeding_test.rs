mod common;

use common::TestWorld;
use stockpilot::{models::LocationStatus, seeding::SeedSummary};

const DEMO: SeedSummary = SeedSummary {
    clients: 2,
    warehouses: 2,
    locations: 7,
    lots: 3,
};

#[tokio::test]
async fn demo_data_is_consistent() {
    let world = TestWorld::new();
    let summary = world.seeder.seed().await.unwrap();
    assert_eq!(summary, DEMO);

    let snapshot = world.snapshot();
    assert_eq!(snapshot.clients.len(), 2);
    assert_eq!(snapshot.locations.len(), 7);
    assert_eq!(snapshot.movements.len(), 3);
    assert_eq!(
        snapshot
            .locations
            .values()
            .filter(|l| l.status == LocationStatus::Occupied)
            .count(),
        3
    );
    assert!(snapshot
        .movements
        .iter()
        .all(|m| m.reason.as_deref() == Some("Demo data")));
    world.assert_occupancy_invariant();

    let lots = world.services.lot_query.list().await.unwrap();
    let references: Vec<_> = lots.iter().map(|l| l.reference.as_str()).collect();
    assert_eq!(
        references,
        vec!["LOT-2024-001", "LOT-2024-002", "LOT-2024-003"]
    );
    assert_eq!(lots[1].client_name, "TechStart Inc");
    assert_eq!(lots[1].warehouse_name.as_deref(), Some("Lyon Warehouse"));
}

#[tokio::test]
async fn seed_if_empty_runs_once() {
    let world = TestWorld::new();
    assert_eq!(world.seeder.seed_if_empty().await.unwrap(), Some(DEMO));
    assert_eq!(world.seeder.seed_if_empty().await.unwrap(), None);
    assert_eq!(world.snapshot().clients.len(), 2);
}

#[tokio::test]
async fn reset_replaces_existing_records() {
    let world = TestWorld::new();
    world.client("Leftover").await;
    world.warehouse("Nantes").await;

    let summary = world.seeder.reset_and_seed().await.unwrap();
    assert_eq!(summary, DEMO);

    let snapshot = world.snapshot();
    assert_eq!(snapshot.clients.len(), 2);
    assert!(snapshot.clients.values().all(|c| c.name != "Leftover"));
    assert_eq!(snapshot.warehouses.len(), 2);
    world.assert_occupancy_invariant();
}
