//! Demo dataset for local development.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::models::{Client, Location, LocationStatus, Lot, Movement, Warehouse};
use crate::repositories::{finish, UnitOfWork};
use crate::services::ServiceContext;

/// Counts of what a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub clients: usize,
    pub warehouses: usize,
    pub locations: usize,
    pub lots: usize,
}

#[derive(Debug, Clone)]
pub struct DemoDataSeeder {
    ctx: ServiceContext,
}

impl DemoDataSeeder {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Inserts the demo dataset on top of whatever exists.
    #[instrument(skip(self))]
    pub async fn seed(&self) -> Result<SeedSummary, ServiceError> {
        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = self.insert_demo_data(uow.as_ref(), now).await;
        let summary = finish(uow, result).await?;
        info!(?summary, "demo data seeded");
        Ok(summary)
    }

    /// Seeds only when no client exists yet.
    #[instrument(skip(self))]
    pub async fn seed_if_empty(&self) -> Result<Option<SeedSummary>, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = uow.clients().list_all().await;
        let existing = finish(uow, result).await?;
        if !existing.is_empty() {
            info!(clients = existing.len(), "database already populated; skipping seed");
            return Ok(None);
        }
        self.seed().await.map(Some)
    }

    /// Wipes every table, then seeds, in one unit of work.
    #[instrument(skip(self))]
    pub async fn reset_and_seed(&self) -> Result<SeedSummary, ServiceError> {
        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result = async {
            uow.purge_all().await?;
            self.insert_demo_data(uow.as_ref(), now).await
        }
        .await;
        let summary = finish(uow, result).await?;
        info!(?summary, "database reset and reseeded");
        Ok(summary)
    }

    async fn insert_demo_data(
        &self,
        uow: &dyn UnitOfWork,
        now: DateTime<Utc>,
    ) -> Result<SeedSummary, ServiceError> {
        let acme = Client::create("Acme Corp", "contact@acme.com", now)?;
        let techstart = Client::create("TechStart Inc", "info@techstart.com", now)?;
        for client in [&acme, &techstart] {
            uow.clients().insert(client).await?;
        }

        let paris = Warehouse::create("Paris Warehouse", "123 Rue de la Paix, 75000 Paris", now)?;
        let lyon = Warehouse::create(
            "Lyon Warehouse",
            "456 Avenue de la République, 69000 Lyon",
            now,
        )?;
        for warehouse in [&paris, &lyon] {
            uow.warehouses().insert(warehouse).await?;
        }

        let mut locations = vec![
            Location::create(paris.id, "A1", Some("Shelf A1"), now)?,
            Location::create(paris.id, "A2", Some("Shelf A2"), now)?,
            Location::create(paris.id, "B1", Some("Zone B1"), now)?,
            Location::create(paris.id, "B2", Some("Zone B2"), now)?,
            Location::create(lyon.id, "C1", Some("Column C1"), now)?,
            Location::create(lyon.id, "C2", Some("Column C2"), now)?,
            Location::create(lyon.id, "D1", Some("Dock D1"), now)?,
        ];

        let lots = vec![
            Lot::create_inbound(
                acme.id,
                locations[2].id,
                "LOT-2024-001",
                Some("Construction materials"),
                now,
            )?,
            Lot::create_inbound(
                techstart.id,
                locations[5].id,
                "LOT-2024-002",
                Some("Computer parts"),
                now,
            )?,
            Lot::create_inbound(
                acme.id,
                locations[3].id,
                "LOT-2024-003",
                Some("Equipment awaiting dispatch"),
                now,
            )?,
        ];

        for location in locations.iter_mut() {
            if lots.iter().any(|lot| lot.location_id == Some(location.id)) {
                location.set_status(LocationStatus::Occupied, now);
            }
            uow.locations().insert(location).await?;
        }

        for lot in &lots {
            uow.lots().insert(lot).await?;
            if let Some(location_id) = lot.location_id {
                let movement = Movement::inbound(
                    lot.id,
                    location_id,
                    self.ctx.actor.as_uuid(),
                    now,
                    Some("Demo data"),
                )?;
                uow.movements().append(&movement).await?;
            }
        }

        Ok(SeedSummary {
            clients: 2,
            warehouses: 2,
            locations: locations.len(),
            lots: lots.len(),
        })
    }
}
