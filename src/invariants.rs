//! Cross-entity occupancy checks.
//!
//! Location status is maintained by the lot lifecycle services rather than
//! derived from lot data, so these checks are how drift gets detected.

use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Location, LocationStatus, Lot, LotStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyViolation {
    #[error("lot {lot_id} has status {status} but location {location_id:?}")]
    LotLocationMismatch {
        lot_id: Uuid,
        status: LotStatus,
        location_id: Option<Uuid>,
    },

    #[error("lot {lot_id} is stored at unknown location {location_id}")]
    UnknownLocation { lot_id: Uuid, location_id: Uuid },

    #[error("location {location_id} holds {lots:?} but is {status}")]
    NotMarkedOccupied {
        location_id: Uuid,
        status: LocationStatus,
        lots: Vec<Uuid>,
    },

    #[error("location {location_id} holds more than one lot: {lots:?}")]
    SharedLocation { location_id: Uuid, lots: Vec<Uuid> },

    #[error("location {location_id} is Occupied but no stored lot references it")]
    PhantomOccupancy { location_id: Uuid },
}

/// Lists every disagreement between lot placement and location status.
pub fn occupancy_violations<'a>(
    lots: impl IntoIterator<Item = &'a Lot>,
    locations: impl IntoIterator<Item = &'a Location>,
) -> Vec<OccupancyViolation> {
    let locations: HashMap<Uuid, &Location> = locations.into_iter().map(|l| (l.id, l)).collect();
    let mut violations = Vec::new();
    let mut residents: HashMap<Uuid, Vec<Uuid>> = HashMap::new();

    for lot in lots {
        if !lot.is_consistent() {
            violations.push(OccupancyViolation::LotLocationMismatch {
                lot_id: lot.id,
                status: lot.status,
                location_id: lot.location_id,
            });
        }
        if lot.status != LotStatus::Stored {
            continue;
        }
        if let Some(location_id) = lot.location_id {
            if !locations.contains_key(&location_id) {
                violations.push(OccupancyViolation::UnknownLocation {
                    lot_id: lot.id,
                    location_id,
                });
            }
            residents.entry(location_id).or_default().push(lot.id);
        }
    }

    for (location_id, location) in &locations {
        match residents.get(location_id) {
            Some(lots) => {
                if lots.len() > 1 {
                    violations.push(OccupancyViolation::SharedLocation {
                        location_id: *location_id,
                        lots: lots.clone(),
                    });
                }
                if location.status != LocationStatus::Occupied {
                    violations.push(OccupancyViolation::NotMarkedOccupied {
                        location_id: *location_id,
                        status: location.status,
                        lots: lots.clone(),
                    });
                }
            }
            None if location.status == LocationStatus::Occupied => {
                violations.push(OccupancyViolation::PhantomOccupancy {
                    location_id: *location_id,
                });
            }
            None => {}
        }
    }

    violations
}
