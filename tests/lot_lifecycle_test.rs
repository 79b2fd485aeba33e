mod common;

use assert_matches::assert_matches;
use common::{location_status, Layout, TestWorld, OPERATOR};
use stockpilot::{
    dto::{InboundLotRequest, OutboundLotRequest},
    errors::ServiceError,
    events::Event,
    models::{LocationStatus, LotStatus, MovementType},
};
use uuid::Uuid;

#[tokio::test]
async fn inbound_stores_lot_and_occupies_location() {
    let mut world = TestWorld::new();
    let layout = Layout::build(&world).await;
    world.drain_events();

    let lot = world
        .services
        .inbound
        .inbound(InboundLotRequest {
            client_id: layout.client.id,
            location_id: layout.paris_a1.id,
            reference: "  LOT-001 ".into(),
            description: Some("Pallet of screws".into()),
        })
        .await
        .unwrap();

    assert_eq!(lot.status, "STORED");
    assert_eq!(lot.reference, "LOT-001");
    assert_eq!(lot.location_id, layout.paris_a1.id);
    assert_eq!(location_status(&world, layout.paris_a1.id), "OCCUPIED");

    let snapshot = world.snapshot();
    let movements = snapshot.movements_for(lot.id);
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].movement_type, MovementType::Inbound);
    assert_eq!(movements[0].from_location_id, None);
    assert_eq!(movements[0].to_location_id, Some(layout.paris_a1.id));
    assert_eq!(movements[0].performed_by, OPERATOR);
    assert_eq!(movements[0].occurred_at, common::start_time());

    assert_eq!(
        world.drain_events(),
        vec![Event::LotReceived {
            lot_id: lot.id,
            location_id: layout.paris_a1.id,
        }]
    );
    world.assert_occupancy_invariant();
}

#[tokio::test]
async fn inbound_into_occupied_location_changes_nothing() {
    let mut world = TestWorld::new();
    let layout = Layout::build(&world).await;
    world
        .inbound(layout.client.id, layout.paris_a1.id, "LOT-001")
        .await;
    world.drain_events();
    let before = world.snapshot();

    let err = world
        .services
        .inbound
        .inbound(InboundLotRequest {
            client_id: layout.client.id,
            location_id: layout.paris_a1.id,
            reference: "LOT-002".into(),
            description: None,
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::ValidationError(ref m) if m == "Location is not available.");
    let after = world.snapshot();
    assert_eq!(after.lots.len(), before.lots.len());
    assert_eq!(after.movements.len(), before.movements.len());
    assert!(world.drain_events().is_empty());
    world.assert_occupancy_invariant();
}

#[tokio::test]
async fn inbound_validates_request_before_touching_storage() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let writes = world.store.write_count();

    let cases = [
        (Uuid::nil(), layout.paris_a1.id, "LOT", "ClientId is required."),
        (layout.client.id, Uuid::nil(), "LOT", "LocationId is required."),
        (layout.client.id, layout.paris_a1.id, "   ", "Reference is required."),
    ];
    for (client_id, location_id, reference, expected) in cases {
        let err = world
            .services
            .inbound
            .inbound(InboundLotRequest {
                client_id,
                location_id,
                reference: reference.into(),
                description: None,
            })
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(ref m) if m == expected);
    }
    assert_eq!(world.store.write_count(), writes);
}

#[tokio::test]
async fn inbound_rejects_unknown_client_and_location() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;

    let err = world
        .services
        .inbound
        .inbound(InboundLotRequest {
            client_id: Uuid::new_v4(),
            location_id: layout.paris_a1.id,
            reference: "LOT".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(ref m) if m == "Client does not exist.");

    let err = world
        .services
        .inbound
        .inbound(InboundLotRequest {
            client_id: layout.client.id,
            location_id: Uuid::new_v4(),
            reference: "LOT".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(ref m) if m == "Location does not exist.");
}

#[tokio::test]
async fn outbound_releases_location() {
    let mut world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let lot = world
        .inbound(layout.client.id, layout.paris_a1.id, "LOT-001")
        .await;
    world.advance_minutes(30);
    world.drain_events();

    let retrieved = world
        .services
        .outbound
        .outbound(OutboundLotRequest {
            lot_id: lot.id,
            notes: Some("Picked up by carrier".into()),
        })
        .await
        .unwrap();

    assert_eq!(retrieved.status, "RETRIEVED");
    assert!(retrieved.location_id.is_nil());
    assert_eq!(location_status(&world, layout.paris_a1.id), "AVAILABLE");

    let snapshot = world.snapshot();
    let movements = snapshot.movements_for(lot.id);
    assert_eq!(movements.len(), 2);
    let outbound = movements[1];
    assert_eq!(outbound.movement_type, MovementType::Outbound);
    assert_eq!(outbound.from_location_id, Some(layout.paris_a1.id));
    assert_eq!(outbound.to_location_id, None);
    assert_eq!(outbound.reason.as_deref(), Some("Picked up by carrier"));
    assert_eq!(snapshot.lots[&lot.id].status, LotStatus::Retrieved);

    assert_eq!(
        world.drain_events(),
        vec![Event::LotRetrieved {
            lot_id: lot.id,
            from_location_id: layout.paris_a1.id,
        }]
    );
    world.assert_occupancy_invariant();
}

#[tokio::test]
async fn outbound_twice_reports_current_status() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let lot = world
        .inbound(layout.client.id, layout.paris_a1.id, "LOT-001")
        .await;
    let request = OutboundLotRequest {
        lot_id: lot.id,
        notes: None,
    };
    world
        .services
        .outbound
        .outbound(request.clone())
        .await
        .unwrap();

    let err = world.services.outbound.outbound(request).await.unwrap_err();
    assert_matches!(
        err,
        ServiceError::ValidationError(ref m)
            if m == "Lot is not in 'Stored' status. Current status: 'Retrieved'."
    );
}

#[tokio::test]
async fn outbound_of_unknown_lot_is_not_found() {
    let world = TestWorld::new();
    let err = world
        .services
        .outbound
        .outbound(OutboundLotRequest {
            lot_id: Uuid::new_v4(),
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let err = world
        .services
        .outbound
        .outbound(OutboundLotRequest::default())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(ref m) if m == "LotId is required.");
}

#[tokio::test]
async fn released_location_accepts_a_new_lot() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let first = world
        .inbound(layout.client.id, layout.lyon_b1.id, "LOT-001")
        .await;
    world
        .services
        .outbound
        .outbound(OutboundLotRequest {
            lot_id: first.id,
            notes: None,
        })
        .await
        .unwrap();

    let second = world
        .inbound(layout.client.id, layout.lyon_b1.id, "LOT-002")
        .await;
    assert_eq!(second.location_id, layout.lyon_b1.id);
    world.assert_occupancy_invariant();
}

#[tokio::test]
async fn outbound_refuses_lot_whose_location_is_not_occupied() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let lot = world
        .inbound(layout.client.id, layout.paris_a1.id, "LOT-001")
        .await;
    world
        .force_location_status(layout.paris_a1.id, LocationStatus::Available)
        .await;
    let writes = world.store.write_count();

    let err = world
        .services
        .outbound
        .outbound(OutboundLotRequest {
            lot_id: lot.id,
            notes: None,
        })
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ServiceError::ValidationError(ref m) if m == "Location is not in 'Occupied' status."
    );
    assert_eq!(world.store.write_count(), writes);
    assert_eq!(world.snapshot().lots[&lot.id].status, LotStatus::Stored);
    assert_eq!(world.snapshot().movements_for(lot.id).len(), 1);
}

#[tokio::test]
async fn outbound_refuses_lot_pointing_at_missing_location() {
    let world = TestWorld::new();
    let layout = Layout::build(&world).await;
    let lot = world
        .inbound(layout.client.id, layout.paris_a1.id, "LOT-001")
        .await;
    world.force_lot_location(lot.id, Uuid::new_v4()).await;
    let writes = world.store.write_count();

    let err = world
        .services
        .outbound
        .outbound(OutboundLotRequest {
            lot_id: lot.id,
            notes: None,
        })
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ServiceError::ValidationError(ref m)
            if m == "Location associated to this lot does not exist."
    );
    assert_eq!(world.store.write_count(), writes);
    assert_eq!(world.snapshot().lots[&lot.id].status, LotStatus::Stored);
}
