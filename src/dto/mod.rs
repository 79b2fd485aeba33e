//! Shapes exchanged with callers of the services and the HTTP surface.

pub mod directory;
pub mod lot;
pub mod movement;

pub use directory::{
    ClientDto, CreateClientRequest, CreateLocationRequest, CreateWarehouseRequest, LocationDto,
    UpdateClientRequest, UpdateLocationRequest, UpdateWarehouseRequest, WarehouseDto,
};
pub use lot::{
    InboundLotRequest, LotDetailDto, LotDto, MoveInternalLotRequest, OutboundLotRequest,
    TransferDispatchRequest, TransferReceiveRequest, UpdateLotRequest,
};
pub use movement::MovementDto;
