use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Lot;
use crate::repositories::LotDetail;

/// Register a new lot at an available location.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InboundLotRequest {
    #[serde(default)]
    pub client_id: Uuid,
    #[serde(default)]
    pub location_id: Uuid,
    #[serde(default)]
    pub reference: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutboundLotRequest {
    #[serde(default)]
    pub lot_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MoveInternalLotRequest {
    #[serde(default)]
    pub lot_id: Uuid,
    #[serde(default)]
    pub destination_location_id: Uuid,
    pub notes: Option<String>,
}

/// First leg of a transfer. The destination must sit in another warehouse.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransferDispatchRequest {
    #[serde(default)]
    pub lot_id: Uuid,
    #[serde(default)]
    pub destination_location_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransferReceiveRequest {
    #[serde(default)]
    pub lot_id: Uuid,
    #[serde(default)]
    pub destination_location_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateLotRequest {
    #[serde(default)]
    pub lot_id: Uuid,
    #[serde(default)]
    pub reference: String,
    pub description: Option<String>,
}

/// Lot as returned by the lifecycle operations.
///
/// `location_id` is the nil UUID whenever the lot is not stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDto {
    pub id: Uuid,
    pub client_id: Uuid,
    pub location_id: Uuid,
    pub reference: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Lot> for LotDto {
    fn from(lot: &Lot) -> Self {
        Self {
            id: lot.id,
            client_id: lot.client_id,
            location_id: lot.location_id.unwrap_or_default(),
            reference: lot.reference.clone(),
            description: lot.description.clone(),
            status: lot.status.code().to_string(),
            created_at: lot.created_at,
            updated_at: lot.updated_at,
        }
    }
}

impl From<Lot> for LotDto {
    fn from(lot: Lot) -> Self {
        Self::from(&lot)
    }
}

/// Lot joined with the names of what it refers to, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDetailDto {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub location_id: Uuid,
    pub location_code: Option<String>,
    pub warehouse_id: Uuid,
    pub warehouse_name: Option<String>,
    pub reference: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LotDetail> for LotDetailDto {
    fn from(detail: LotDetail) -> Self {
        Self {
            id: detail.id,
            client_id: detail.client_id,
            client_name: detail.client_name,
            location_id: detail.location_id.unwrap_or_default(),
            location_code: detail.location_code,
            warehouse_id: detail.warehouse_id.unwrap_or_default(),
            warehouse_name: detail.warehouse_name,
            reference: detail.reference,
            description: detail.description,
            status: detail.status.code().to_string(),
            created_at: detail.created_at,
            updated_at: detail.updated_at,
        }
    }
}
