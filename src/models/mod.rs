//! Persistent entities and the state transitions they own.
//!
//! Each submodule is a sea-orm entity whose `Model` also carries the domain
//! operations for that record. Transitions never touch storage; callers are
//! responsible for persisting the mutated model.

use thiserror::Error;
use validator::Validate;

pub mod client;
pub mod location;
pub mod lot;
pub mod movement;
pub mod warehouse;

pub use client::{ClientStatus, Entity as ClientEntity, Model as Client};
pub use location::{Entity as LocationEntity, LocationStatus, Model as Location};
pub use lot::{Entity as LotEntity, LotStatus, Model as Lot};
pub use movement::{Entity as MovementEntity, Model as Movement, MovementType};
pub use warehouse::{Entity as WarehouseEntity, Model as Warehouse, WarehouseStatus};

/// Failure raised by an entity transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidState(String),
}

/// Trims `value`, failing with `message` when nothing is left.
pub(crate) fn required_text(value: &str, message: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trims free text; blank input becomes `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Runs the column-length rules declared on a model.
pub(crate) fn check_lengths<T: Validate>(model: &T) -> Result<(), DomainError> {
    model
        .validate()
        .map_err(|e| DomainError::Validation(format!("Field length exceeded: {}", e)))
}
