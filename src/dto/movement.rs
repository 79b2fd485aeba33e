use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Movement;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDto {
    pub id: Uuid,
    pub lot_id: Uuid,
    #[serde(rename = "type")]
    pub movement_type: String,
    pub type_code: i32,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
    pub performed_by: Uuid,
    pub reason: Option<String>,
}

impl From<Movement> for MovementDto {
    fn from(movement: Movement) -> Self {
        Self {
            id: movement.id,
            lot_id: movement.lot_id,
            movement_type: movement.movement_type.code().to_string(),
            type_code: movement.movement_type.number(),
            from_location_id: movement.from_location_id,
            to_location_id: movement.to_location_id,
            occurred_at: movement.occurred_at,
            performed_by: movement.performed_by,
            reason: movement.reason,
        }
    }
}
