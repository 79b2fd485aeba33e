mod common;

use assert_matches::assert_matches;
use common::{location_status, Layout, TestWorld};
use stockpilot::{
    dto::{InboundLotRequest, MoveInternalLotRequest, OutboundLotRequest},
    errors::ServiceError,
    models::LotStatus,
    repositories::in_memory::FailPoint,
    services::ActorId,
};
use uuid::Uuid;

#[tokio::test]
async fn failed_movement_append_rolls_back_inbound() {
    let mut world = TestWorld::new();
    let layout = Layout::build(&world).await;
    world.drain_events();
    world.store.set_fail_point(Some(FailPoint::MovementAppend));

    let err = world
        .services
        .inbound
        .inbound(InboundLotRequest {
            client_id: layout.client.id,
            location_id: layout.paris_a1.id,
            reference: "LOT-001".into(),
            description: None,
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::DatabaseError(_));
    let snapshot = world.snapshot();
    assert!(snapshot.lots.is_empty());
    assert!(snapshot.movements.is_empty());
    assert_eq!(location_status(&world, layout.paris_a1.id), "AVAILABLE");
    assert!(world.drain_events().is_empty());

    world.store.set_fail_point(None);
    world
        .inbound(layout.client.id, layout.paris_a1.id, "LOT-001")
        .await;
    world.assert_occupancy_invariant();
}

#[tokio::test]
async fn failed_location_write_rolls_back_move() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let lot = world
        .inbound(layout.client.id, layout.paris_a1.id, "LOT-001")
        .await;
    let movements_before = world.snapshot().movements.len();
    world.store.set_fail_point(Some(FailPoint::LocationWrite));

    let err = world
        .services
        .move_internal
        .move_lot(MoveInternalLotRequest {
            lot_id: lot.id,
            destination_location_id: layout.paris_a2.id,
            notes: None,
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::DatabaseError(_));
    let snapshot = world.snapshot();
    assert_eq!(snapshot.lots[&lot.id].location_id, Some(layout.paris_a1.id));
    assert_eq!(snapshot.movements.len(), movements_before);
    assert_eq!(location_status(&world, layout.paris_a1.id), "OCCUPIED");
    assert_eq!(location_status(&world, layout.paris_a2.id), "AVAILABLE");
    world.assert_occupancy_invariant();
}

#[tokio::test]
async fn failed_lot_write_rolls_back_outbound() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let lot = world
        .inbound(layout.client.id, layout.lyon_b1.id, "LOT-001")
        .await;
    world.store.set_fail_point(Some(FailPoint::LotWrite));

    let result = world
        .services
        .outbound
        .outbound(OutboundLotRequest {
            lot_id: lot.id,
            notes: None,
        })
        .await;

    assert_matches!(result, Err(ServiceError::DatabaseError(_)));
    assert_eq!(world.snapshot().lots[&lot.id].status, LotStatus::Stored);
    assert_eq!(location_status(&world, layout.lyon_b1.id), "OCCUPIED");
    world.assert_occupancy_invariant();
}

#[tokio::test]
async fn movements_record_the_acting_principal() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let lot = world
        .inbound(layout.client.id, layout.paris_a1.id, "LOT-001")
        .await;

    let picker = Uuid::from_u128(0xBEEF);
    let services = stockpilot::services::Services::new(
        world.ctx.with_actor(ActorId::new(picker).unwrap()),
    );
    services
        .outbound
        .outbound(OutboundLotRequest {
            lot_id: lot.id,
            notes: None,
        })
        .await
        .unwrap();

    let snapshot = world.snapshot();
    let performers: Vec<_> = snapshot
        .movements_for(lot.id)
        .iter()
        .map(|m| m.performed_by)
        .collect();
    assert_eq!(performers, vec![common::OPERATOR, picker]);

    assert_matches!(
        ActorId::new(Uuid::nil()),
        Err(ServiceError::ValidationError(ref m)) if m == "PerformedBy is required."
    );
}
