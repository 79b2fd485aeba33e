use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::{check_lengths, required_text, DomainError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::IntoStaticStr,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "UPPERCASE")]
pub enum WarehouseStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

impl WarehouseStatus {
    pub fn code(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for WarehouseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarehouseStatus::Active => write!(f, "Active"),
            WarehouseStatus::Closed => write!(f, "Closed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[validate(length(max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub address: String,
    pub status: WarehouseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::location::Entity")]
    Locations,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn create(name: &str, address: &str, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let warehouse = Self {
            id: Uuid::new_v4(),
            name: required_text(name, "Warehouse name is required.")?,
            address: required_text(address, "Warehouse address is required.")?,
            status: WarehouseStatus::Active,
            created_at: now,
            updated_at: now,
        };
        check_lengths(&warehouse)?;
        Ok(warehouse)
    }

    pub fn update(&mut self, name: &str, address: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut updated = self.clone();
        updated.name = required_text(name, "Warehouse name is required.")?;
        updated.address = required_text(address, "Warehouse address is required.")?;
        updated.updated_at = now;
        check_lengths(&updated)?;
        *self = updated;
        Ok(())
    }

    pub fn set_status(&mut self, status: WarehouseStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn close(&mut self, now: DateTime<Utc>) {
        self.set_status(WarehouseStatus::Closed, now);
    }

    pub fn is_closed(&self) -> bool {
        self.status == WarehouseStatus::Closed
    }
}
