use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::{check_lengths, optional_text, required_text, DomainError};

/// Lifecycle state of a lot.
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
pub enum LotStatus {
    #[sea_orm(string_value = "Stored")]
    Stored,
    #[sea_orm(string_value = "InTransit")]
    InTransit,
    #[sea_orm(string_value = "Retrieved")]
    Retrieved,
    #[sea_orm(string_value = "Archived")]
    Archived,
}

impl LotStatus {
    /// Upper-case code shown to API callers, e.g. `STORED` or `INTRANSIT`.
    pub fn code(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotStatus::Stored => write!(f, "Stored"),
            LotStatus::InTransit => write!(f, "InTransit"),
            LotStatus::Retrieved => write!(f, "Retrieved"),
            LotStatus::Archived => write!(f, "Archived"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "lots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    /// Set exactly when the lot is `Stored`.
    pub location_id: Option<Uuid>,
    #[validate(length(max = 100))]
    pub reference: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub status: LotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(has_many = "super::movement::Entity")]
    Movements,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Registers a lot arriving at `location_id`. The new lot is `Stored`.
    pub fn create_inbound(
        client_id: Uuid,
        location_id: Uuid,
        reference: &str,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if client_id.is_nil() {
            return Err(DomainError::Validation("ClientId is required.".into()));
        }
        if location_id.is_nil() {
            return Err(DomainError::Validation("LocationId is required.".into()));
        }
        let reference = required_text(reference, "Reference is required.")?;

        let lot = Self {
            id: Uuid::new_v4(),
            client_id,
            location_id: Some(location_id),
            reference,
            description: optional_text(description),
            status: LotStatus::Stored,
            created_at: now,
            updated_at: now,
        };
        check_lengths(&lot)?;
        Ok(lot)
    }

    /// Location the lot currently sits in, provided it is `Stored` there.
    pub fn stored_location(&self) -> Result<Uuid, DomainError> {
        match (self.status, self.location_id) {
            (LotStatus::Stored, Some(location_id)) => Ok(location_id),
            _ => Err(DomainError::InvalidState(format!(
                "Lot '{}' is not stored at a location. Current status: '{}'.",
                self.id, self.status
            ))),
        }
    }

    /// Stored -> Retrieved. The lot leaves the warehouse network.
    pub fn retrieve(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.stored_location()?;
        self.status = LotStatus::Retrieved;
        self.location_id = None;
        self.updated_at = now;
        Ok(())
    }

    /// Stored -> Stored at `new_location_id`.
    pub fn move_to(&mut self, new_location_id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.stored_location()?;
        if new_location_id.is_nil() {
            return Err(DomainError::Validation(
                "DestinationLocationId is required.".into(),
            ));
        }
        self.location_id = Some(new_location_id);
        self.updated_at = now;
        Ok(())
    }

    /// Stored -> InTransit. The lot no longer occupies any location.
    pub fn dispatch(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.stored_location()?;
        self.status = LotStatus::InTransit;
        self.location_id = None;
        self.updated_at = now;
        Ok(())
    }

    /// InTransit -> Stored at `destination_location_id`.
    pub fn receive(
        &mut self,
        destination_location_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status != LotStatus::InTransit {
            return Err(DomainError::InvalidState(format!(
                "Lot '{}' is not in 'InTransit' status. Current status: '{}'.",
                self.id, self.status
            )));
        }
        if destination_location_id.is_nil() {
            return Err(DomainError::Validation(
                "DestinationLocationId is required.".into(),
            ));
        }
        self.status = LotStatus::Stored;
        self.location_id = Some(destination_location_id);
        self.updated_at = now;
        Ok(())
    }

    /// Replaces reference and description. Status rules are enforced by the caller.
    pub fn update_metadata(
        &mut self,
        reference: &str,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let reference = required_text(reference, "Lot reference is required.")?;
        let description = optional_text(description);

        let mut updated = self.clone();
        updated.reference = reference;
        updated.description = description;
        updated.updated_at = now;
        check_lengths(&updated)?;

        *self = updated;
        Ok(())
    }

    /// Moves the lot to `Archived`. A lot still occupying a location cannot be archived.
    pub fn archive(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status == LotStatus::Stored {
            return Err(DomainError::InvalidState(
                "Cannot archive a lot with status 'STORED'. Retrieve it first.".into(),
            ));
        }
        self.status = LotStatus::Archived;
        self.location_id = None;
        self.updated_at = now;
        Ok(())
    }

    /// Location is present exactly when the lot is stored.
    pub fn is_consistent(&self) -> bool {
        self.location_id.is_some() == (self.status == LotStatus::Stored)
    }
}
