use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::{check_lengths, optional_text, required_text, DomainError};

/// Occupancy state of a storage location.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::IntoStaticStr,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LocationStatus {
    #[sea_orm(string_value = "Available")]
    Available,
    #[sea_orm(string_value = "Occupied")]
    Occupied,
    #[sea_orm(string_value = "Maintenance")]
    Maintenance,
}

impl LocationStatus {
    pub fn code(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationStatus::Available => write!(f, "Available"),
            LocationStatus::Occupied => write!(f, "Occupied"),
            LocationStatus::Maintenance => write!(f, "Maintenance"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub warehouse_id: Uuid,
    #[validate(length(max = 50))]
    pub code: String,
    #[validate(length(max = 200))]
    pub label: Option<String>,
    pub status: LocationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(has_many = "super::lot::Entity")]
    Lots,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// New locations start out `Available`.
    pub fn create(
        warehouse_id: Uuid,
        code: &str,
        label: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if warehouse_id.is_nil() {
            return Err(DomainError::Validation("WarehouseId is required.".into()));
        }
        let code = required_text(code, "Location code is required.")?;

        let location = Self {
            id: Uuid::new_v4(),
            warehouse_id,
            code,
            label: optional_text(label),
            status: LocationStatus::Available,
            created_at: now,
            updated_at: now,
        };
        check_lengths(&location)?;
        Ok(location)
    }

    pub fn update(
        &mut self,
        code: &str,
        label: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let code = required_text(code, "Location code is required.")?;

        let mut updated = self.clone();
        updated.code = code;
        updated.label = optional_text(label);
        updated.updated_at = now;
        check_lengths(&updated)?;

        *self = updated;
        Ok(())
    }

    /// Overwrites the occupancy status. Only lot lifecycle operations call this.
    pub fn set_status(&mut self, status: LocationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn disable_to_maintenance(&mut self, now: DateTime<Utc>) {
        self.set_status(LocationStatus::Maintenance, now);
    }

    pub fn is_available(&self) -> bool {
        self.status == LocationStatus::Available
    }
}
