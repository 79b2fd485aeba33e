//! Application services. Each public operation runs in one unit of work and
//! publishes its domain event only after the commit succeeded.

use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{Location, Lot, LotStatus};
use crate::repositories::UnitOfWork;

pub mod clients;
pub mod context;
pub mod inbound_lot;
pub mod locations;
pub mod lot_query;
pub mod move_internal_lot;
pub mod movement_query;
pub mod outbound_lot;
pub mod transfer_lot;
pub mod update_lot;
pub mod warehouses;

pub use clients::ClientService;
pub use context::{ActorId, Clock, FixedClock, ServiceContext, SystemClock};
pub use inbound_lot::InboundLotService;
pub use locations::LocationService;
pub use lot_query::LotQueryService;
pub use move_internal_lot::MoveInternalLotService;
pub use movement_query::MovementQueryService;
pub use outbound_lot::OutboundLotService;
pub use transfer_lot::TransferLotService;
pub use update_lot::UpdateLotService;
pub use warehouses::WarehouseService;

/// Every service, sharing one context.
#[derive(Debug, Clone)]
pub struct Services {
    pub clients: ClientService,
    pub warehouses: WarehouseService,
    pub locations: LocationService,
    pub inbound: InboundLotService,
    pub outbound: OutboundLotService,
    pub move_internal: MoveInternalLotService,
    pub transfer: TransferLotService,
    pub update_lot: UpdateLotService,
    pub lot_query: LotQueryService,
    pub movement_query: MovementQueryService,
}

impl Services {
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            clients: ClientService::new(ctx.clone()),
            warehouses: WarehouseService::new(ctx.clone()),
            locations: LocationService::new(ctx.clone()),
            inbound: InboundLotService::new(ctx.clone()),
            outbound: OutboundLotService::new(ctx.clone()),
            move_internal: MoveInternalLotService::new(ctx.clone()),
            transfer: TransferLotService::new(ctx.clone()),
            update_lot: UpdateLotService::new(ctx.clone()),
            lot_query: LotQueryService::new(ctx.clone()),
            movement_query: MovementQueryService::new(ctx),
        }
    }
}

pub(crate) fn require_id(id: Uuid, message: &str) -> Result<(), ServiceError> {
    if id.is_nil() {
        return Err(ServiceError::ValidationError(message.to_string()));
    }
    Ok(())
}

pub(crate) async fn load_lot(uow: &dyn UnitOfWork, id: Uuid) -> Result<Lot, ServiceError> {
    uow.lots()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::lot_not_found(id))
}

/// Location the lot is stored at, or the caller-facing reason it has none.
pub(crate) fn stored_location_of(lot: &Lot, missing_message: &str) -> Result<Uuid, ServiceError> {
    if lot.status != LotStatus::Stored {
        return Err(ServiceError::ValidationError(format!(
            "Lot is not in 'Stored' status. Current status: '{}'.",
            lot.status
        )));
    }
    lot.location_id
        .ok_or_else(|| ServiceError::ValidationError(missing_message.to_string()))
}

/// Destination that must exist (404 otherwise) and be free.
pub(crate) async fn available_destination(
    uow: &dyn UnitOfWork,
    id: Uuid,
) -> Result<Location, ServiceError> {
    let destination = uow
        .locations()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::location_not_found(id))?;
    if !destination.is_available() {
        return Err(ServiceError::ValidationError(
            "Destination location is not available.".into(),
        ));
    }
    Ok(destination)
}
