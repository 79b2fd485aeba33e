//! StockPilot
//!
//! Warehouse inventory tracking: clients, warehouses, storage locations, the
//! lots stored in them and the append-only ledger of lot movements.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod invariants;
pub mod models;
pub mod repositories;
pub mod seeding;
pub mod services;

use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::repositories::SeaOrmStore;
use crate::services::{ActorId, ServiceContext, SystemClock};

pub use crate::handlers::{router, AppState};

/// Database-backed service context built from configuration.
pub struct Runtime {
    pub db: Arc<DbPool>,
    pub ctx: ServiceContext,
}

/// Connects, migrates when configured, and wires the services to the database.
pub async fn bootstrap(cfg: &AppConfig, events: EventSender) -> Result<Runtime, ServiceError> {
    let pool = db::establish_connection_from_app_config(cfg).await?;
    if cfg.auto_migrate {
        db::run_migrations(&pool).await?;
    }

    let db = Arc::new(pool);
    let actor = ActorId::new(cfg.system_operator_id)?;
    let ctx = ServiceContext::new(
        Arc::new(SeaOrmStore::new(db.clone())),
        actor,
        Arc::new(SystemClock),
        events,
    );
    info!(%actor, "services ready");
    Ok(Runtime { db, ctx })
}
