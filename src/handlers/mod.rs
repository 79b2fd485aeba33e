//! HTTP surface over the services.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::DbPool;
use crate::seeding::DemoDataSeeder;
use crate::services::{ServiceContext, Services};

pub mod clients;
pub mod dev;
pub mod health;
pub mod locations;
pub mod lots;
pub mod movements;
pub mod warehouses;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub seeder: DemoDataSeeder,
    /// Present when backed by a relational database; used by `/health`.
    pub db: Option<Arc<DbPool>>,
    pub dev_endpoints_enabled: bool,
}

impl AppState {
    pub fn new(ctx: ServiceContext, db: Option<Arc<DbPool>>, dev_endpoints_enabled: bool) -> Self {
        Self {
            services: Services::new(ctx.clone()),
            seeder: DemoDataSeeder::new(ctx),
            db,
            dev_endpoints_enabled,
        }
    }
}

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    let clients = Router::new()
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/{id}",
            get(clients::get)
                .put(clients::update)
                .delete(clients::deactivate),
        )
        .route("/clients/{id}/lots", get(lots::by_client));

    let warehouses = Router::new()
        .route("/warehouses", get(warehouses::list).post(warehouses::create))
        .route(
            "/warehouses/{id}",
            get(warehouses::get)
                .put(warehouses::update)
                .delete(warehouses::close),
        )
        .route("/warehouses/{id}/locations", get(locations::by_warehouse))
        .route("/warehouses/{id}/lots", get(lots::by_warehouse));

    let locations = Router::new()
        .route("/locations", get(locations::list).post(locations::create))
        .route(
            "/locations/{id}",
            get(locations::get)
                .put(locations::update)
                .delete(locations::disable),
        );

    let lots = Router::new()
        .route("/lots", get(lots::list))
        .route("/lots/inbound", post(lots::inbound))
        .route(
            "/lots/{id}",
            get(lots::get).put(lots::update).delete(lots::archive),
        )
        .route("/lots/{id}/outbound", post(lots::outbound))
        .route("/lots/{id}/move", post(lots::move_internal))
        .route("/lots/{id}/dispatch", post(lots::dispatch))
        .route("/lots/{id}/receive", post(lots::receive))
        .route("/lots/{id}/movements", get(movements::by_lot))
        .route("/movements/{id}", get(movements::get));

    let mut app = Router::new()
        .route("/health", get(health::health))
        .merge(clients)
        .merge(warehouses)
        .merge(locations)
        .merge(lots);

    if state.dev_endpoints_enabled {
        app = app.route("/dev/reset-seed", post(dev::reset_seed));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
