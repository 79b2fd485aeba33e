use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Client, Location, Warehouse};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateClientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateClientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDto {
    pub id: Uuid,
    pub name: String,
    pub contact_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            contact_email: client.contact_email,
            status: client.status.code().to_string(),
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateWarehouseRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateWarehouseRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseDto {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Warehouse> for WarehouseDto {
    fn from(warehouse: Warehouse) -> Self {
        Self {
            id: warehouse.id,
            name: warehouse.name,
            address: warehouse.address,
            status: warehouse.status.code().to_string(),
            created_at: warehouse.created_at,
            updated_at: warehouse.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateLocationRequest {
    #[serde(default)]
    pub warehouse_id: Uuid,
    #[serde(default)]
    pub code: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateLocationRequest {
    #[serde(default)]
    pub code: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDto {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub code: String,
    pub label: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Location> for LocationDto {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            warehouse_id: location.warehouse_id,
            code: location.code,
            label: location.label,
            status: location.status.code().to_string(),
            created_at: location.created_at,
            updated_at: location.updated_at,
        }
    }
}
