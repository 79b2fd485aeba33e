mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::TestWorld;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stockpilot::{router, AppState};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    world: TestWorld,
}

impl TestApp {
    fn new(dev_endpoints: bool) -> Self {
        let world = TestWorld::new();
        let state = AppState::new(world.ctx.clone(), None, dev_endpoints);
        Self {
            router: router(state),
            world,
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_lot_journey_over_http() {
    let app = TestApp::new(false);

    let (status, client) = app
        .post(
            "/clients",
            json!({ "name": "Acme Corp", "contact_email": "contact@acme.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(client["status"], "ACTIVE");

    let (_, paris) = app
        .post("/warehouses", json!({ "name": "Paris", "address": "1 Rue" }))
        .await;
    let (_, lyon) = app
        .post("/warehouses", json!({ "name": "Lyon", "address": "2 Rue" }))
        .await;
    let (status, a1) = app
        .post(
            "/locations",
            json!({ "warehouse_id": id_of(&paris), "code": "A1", "label": "Shelf" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, a2) = app
        .post(
            "/locations",
            json!({ "warehouse_id": id_of(&paris), "code": "A2" }),
        )
        .await;
    let (_, b1) = app
        .post(
            "/locations",
            json!({ "warehouse_id": id_of(&lyon), "code": "B1" }),
        )
        .await;

    let (status, lot) = app
        .post(
            "/lots/inbound",
            json!({
                "client_id": id_of(&client),
                "location_id": id_of(&a1),
                "reference": "LOT-001"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lot["status"], "STORED");
    let lot_id = id_of(&lot);

    let (status, moved) = app
        .post(
            &format!("/lots/{}/move", lot_id),
            json!({ "destination_location_id": id_of(&a2) }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["location_id"], a2["id"]);

    let (status, dispatched) = app
        .post(
            &format!("/lots/{}/dispatch", lot_id),
            json!({ "destination_location_id": id_of(&b1) }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dispatched["status"], "INTRANSIT");
    assert_eq!(dispatched["location_id"], Uuid::nil().to_string());

    let (status, received) = app
        .post(
            &format!("/lots/{}/receive", lot_id),
            json!({ "destination_location_id": id_of(&b1) }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(received["location_id"], b1["id"]);

    let (status, retrieved) = app
        .post(&format!("/lots/{}/outbound", lot_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(retrieved["status"], "RETRIEVED");

    let (status, body) = app
        .request(Method::DELETE, &format!("/lots/{}", lot_id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, history) = app.get(&format!("/lots/{}/movements", lot_id)).await;
    assert_eq!(status, StatusCode::OK);
    let types: Vec<_> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types.len(), 5);
    assert!(types.contains(&"TRANSFER".to_string()));

    let (status, detail) = app.get(&format!("/lots/{}", lot_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "ARCHIVED");

    app.world.assert_occupancy_invariant();
}

#[tokio::test]
async fn errors_map_to_status_codes() {
    let app = TestApp::new(false);

    let (status, body) = app.get(&format!("/lots/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    let (status, body) = app.post("/lots/inbound", json!({ "reference": "X" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ClientId is required.");

    let (_, warehouse) = app
        .post("/warehouses", json!({ "name": "Paris", "address": "1 Rue" }))
        .await;
    let (_, location) = app
        .post(
            "/locations",
            json!({ "warehouse_id": id_of(&warehouse), "code": "A1" }),
        )
        .await;
    let (_, client) = app
        .post(
            "/clients",
            json!({ "name": "Acme", "contact_email": "a@acme.com" }),
        )
        .await;
    app.post(
        "/lots/inbound",
        json!({
            "client_id": id_of(&client),
            "location_id": id_of(&location),
            "reference": "LOT-001"
        }),
    )
    .await;

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/locations/{}", id_of(&location)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        format!("Location '{}' is OCCUPIED and cannot be disabled.", id_of(&location))
    );
}

#[tokio::test]
async fn listings_and_lookups_by_parent() {
    let app = TestApp::new(false);
    app.world.seeder.seed().await.unwrap();

    let (status, warehouses) = app.get("/warehouses").await;
    assert_eq!(status, StatusCode::OK);
    let paris = warehouses
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["name"] == "Paris Warehouse")
        .unwrap()
        .clone();

    let (_, locations) = app
        .get(&format!("/warehouses/{}/locations", id_of(&paris)))
        .await;
    assert_eq!(locations.as_array().unwrap().len(), 4);

    let (_, lots) = app.get(&format!("/warehouses/{}/lots", id_of(&paris))).await;
    assert_eq!(lots.as_array().unwrap().len(), 2);

    let (_, all) = app.get("/lots").await;
    let acme_id = all[0]["client_id"].as_str().unwrap().to_string();
    let (_, acme_lots) = app.get(&format!("/clients/{}/lots", acme_id)).await;
    assert_eq!(acme_lots.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_reports_in_memory_store() {
    let app = TestApp::new(false);
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"]["status"], "in-memory");
}

#[tokio::test]
async fn reset_endpoint_exists_only_when_enabled() {
    let disabled = TestApp::new(false);
    let (status, _) = disabled.post("/dev/reset-seed", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let enabled = TestApp::new(true);
    let (status, summary) = enabled.post("/dev/reset-seed", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["lots"], 3);
    enabled.world.assert_occupancy_invariant();
}

#[tokio::test]
async fn outbound_accepts_a_bare_post() {
    let app = TestApp::new(false);
    let world = &app.world;
    let client = world.client("Acme").await;
    let warehouse = world.warehouse("Paris").await;
    let location = world.location(warehouse.id, "A1").await;
    let lot = world.inbound(client.id, location.id, "LOT-001").await;

    let (status, retrieved) = app
        .request(Method::POST, &format!("/lots/{}/outbound", lot.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(retrieved["status"], "RETRIEVED");
    app.world.assert_occupancy_invariant();
}
