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
pub enum ClientStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
}

impl ClientStatus {
    pub fn code(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientStatus::Active => write!(f, "Active"),
            ClientStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[validate(length(max = 200))]
    pub name: String,
    #[validate(length(max = 320))]
    pub contact_email: String,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lot::Entity")]
    Lots,
}

impl Related<super::lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Minimal shape check: something@something.something, at least 3 characters.
pub fn is_valid_email(email: &str) -> bool {
    let trimmed = email.trim();
    trimmed.len() >= 3 && trimmed.contains('@') && trimmed.contains('.')
}

fn checked_fields(name: &str, contact_email: &str) -> Result<(String, String), DomainError> {
    let name = required_text(name, "Client name is required.")?;
    if !is_valid_email(contact_email) {
        return Err(DomainError::Validation("Contact email is invalid.".into()));
    }
    Ok((name, contact_email.trim().to_string()))
}

impl Model {
    pub fn create(name: &str, contact_email: &str, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let (name, contact_email) = checked_fields(name, contact_email)?;
        let client = Self {
            id: Uuid::new_v4(),
            name,
            contact_email,
            status: ClientStatus::Active,
            created_at: now,
            updated_at: now,
        };
        check_lengths(&client)?;
        Ok(client)
    }

    pub fn update(
        &mut self,
        name: &str,
        contact_email: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let (name, contact_email) = checked_fields(name, contact_email)?;
        let mut updated = self.clone();
        updated.name = name;
        updated.contact_email = contact_email;
        updated.updated_at = now;
        check_lengths(&updated)?;
        *self = updated;
        Ok(())
    }

    pub fn set_inactive(&mut self, now: DateTime<Utc>) {
        self.status = ClientStatus::Inactive;
        self.updated_at = now;
    }

    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}
