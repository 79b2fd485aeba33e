use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::{check_lengths, optional_text, DomainError};

/// Kind of lot motion recorded in the ledger.
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
pub enum MovementType {
    #[sea_orm(string_value = "Inbound")]
    Inbound,
    #[sea_orm(string_value = "Outbound")]
    Outbound,
    #[sea_orm(string_value = "InternalMove")]
    InternalMove,
    #[sea_orm(string_value = "Transfer")]
    Transfer,
    #[sea_orm(string_value = "Adjustment")]
    Adjustment,
    #[sea_orm(string_value = "DamageReport")]
    DamageReport,
}

impl MovementType {
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Stable numeric identifier used by external integrations.
    pub fn number(self) -> i32 {
        match self {
            MovementType::Inbound => 1,
            MovementType::Outbound => 2,
            MovementType::InternalMove => 3,
            MovementType::Transfer => 4,
            MovementType::Adjustment => 5,
            MovementType::DamageReport => 6,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementType::Inbound => write!(f, "Inbound"),
            MovementType::Outbound => write!(f, "Outbound"),
            MovementType::InternalMove => write!(f, "InternalMove"),
            MovementType::Transfer => write!(f, "Transfer"),
            MovementType::Adjustment => write!(f, "Adjustment"),
            MovementType::DamageReport => write!(f, "DamageReport"),
        }
    }
}

/// Immutable ledger entry. There is no update path for movements.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lot_id: Uuid,
    #[sea_orm(column_name = "type")]
    pub movement_type: MovementType,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
    pub performed_by: Uuid,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lot::Entity",
        from = "Column::LotId",
        to = "super::lot::Column::Id"
    )]
    Lot,
}

impl Related<super::lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn require_id(id: Uuid, name: &str) -> Result<(), DomainError> {
    if id.is_nil() {
        return Err(DomainError::Validation(format!("{} is required.", name)));
    }
    Ok(())
}

impl Model {
    fn record(
        lot_id: Uuid,
        movement_type: MovementType,
        from_location_id: Option<Uuid>,
        to_location_id: Option<Uuid>,
        performed_by: Uuid,
        now: DateTime<Utc>,
        reason: Option<&str>,
    ) -> Result<Self, DomainError> {
        require_id(lot_id, "LotId")?;
        if let Some(from) = from_location_id {
            require_id(from, "FromLocationId")?;
        }
        if let Some(to) = to_location_id {
            require_id(to, "ToLocationId")?;
        }
        require_id(performed_by, "PerformedBy")?;

        let movement = Self {
            id: Uuid::new_v4(),
            lot_id,
            movement_type,
            from_location_id,
            to_location_id,
            occurred_at: now,
            performed_by,
            reason: optional_text(reason),
        };
        check_lengths(&movement)?;
        Ok(movement)
    }

    pub fn inbound(
        lot_id: Uuid,
        to_location_id: Uuid,
        performed_by: Uuid,
        now: DateTime<Utc>,
        reason: Option<&str>,
    ) -> Result<Self, DomainError> {
        Self::record(
            lot_id,
            MovementType::Inbound,
            None,
            Some(to_location_id),
            performed_by,
            now,
            reason,
        )
    }

    pub fn outbound(
        lot_id: Uuid,
        from_location_id: Uuid,
        performed_by: Uuid,
        now: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Self, DomainError> {
        Self::record(
            lot_id,
            MovementType::Outbound,
            Some(from_location_id),
            None,
            performed_by,
            now,
            notes,
        )
    }

    pub fn internal_move(
        lot_id: Uuid,
        from_location_id: Uuid,
        to_location_id: Uuid,
        performed_by: Uuid,
        now: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Self, DomainError> {
        Self::record(
            lot_id,
            MovementType::InternalMove,
            Some(from_location_id),
            Some(to_location_id),
            performed_by,
            now,
            notes,
        )
    }

    /// First leg of a transfer: the lot leaves its source location.
    pub fn transfer_dispatch(
        lot_id: Uuid,
        from_location_id: Uuid,
        performed_by: Uuid,
        now: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Self, DomainError> {
        Self::record(
            lot_id,
            MovementType::Transfer,
            Some(from_location_id),
            None,
            performed_by,
            now,
            notes,
        )
    }

    /// Second leg of a transfer: the lot arrives at its destination.
    pub fn transfer_receive(
        lot_id: Uuid,
        to_location_id: Uuid,
        performed_by: Uuid,
        now: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Self, DomainError> {
        Self::record(
            lot_id,
            MovementType::Transfer,
            None,
            Some(to_location_id),
            performed_by,
            now,
            notes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn factories_stamp_type_and_endpoints() {
        let (lot, a, b, who, now) = (
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now(),
        );

        let m = Model::inbound(lot, a, who, now, None).unwrap();
        assert_eq!((m.movement_type, m.from_location_id, m.to_location_id), (MovementType::Inbound, None, Some(a)));

        let m = Model::outbound(lot, a, who, now, None).unwrap();
        assert_eq!((m.movement_type, m.from_location_id, m.to_location_id), (MovementType::Outbound, Some(a), None));

        let m = Model::internal_move(lot, a, b, who, now, None).unwrap();
        assert_eq!((m.movement_type, m.from_location_id, m.to_location_id), (MovementType::InternalMove, Some(a), Some(b)));

        let m = Model::transfer_dispatch(lot, a, who, now, None).unwrap();
        assert_eq!((m.movement_type, m.from_location_id, m.to_location_id), (MovementType::Transfer, Some(a), None));

        let m = Model::transfer_receive(lot, b, who, now, None).unwrap();
        assert_eq!((m.movement_type, m.from_location_id, m.to_location_id), (MovementType::Transfer, None, Some(b)));
        assert_eq!(m.performed_by, who);
        assert_eq!(m.occurred_at, now);
    }

    #[test]
    fn factories_require_identifiers() {
        let now = Utc::now();
        assert_matches!(
            Model::inbound(Uuid::nil(), Uuid::new_v4(), Uuid::new_v4(), now, None),
            Err(DomainError::Validation(m)) if m == "LotId is required."
        );
        assert_matches!(
            Model::outbound(Uuid::new_v4(), Uuid::nil(), Uuid::new_v4(), now, None),
            Err(DomainError::Validation(m)) if m == "FromLocationId is required."
        );
        assert_matches!(
            Model::transfer_receive(Uuid::new_v4(), Uuid::new_v4(), Uuid::nil(), now, None),
            Err(DomainError::Validation(m)) if m == "PerformedBy is required."
        );
    }

    #[test]
    fn notes_are_trimmed() {
        let m = Model::outbound(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Utc::now(), Some("  picked up  ")).unwrap();
        assert_eq!(m.reason.as_deref(), Some("picked up"));
        let m = Model::outbound(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Utc::now(), Some("   ")).unwrap();
        assert_eq!(m.reason, None);
    }

    #[test]
    fn type_codes() {
        assert_eq!(MovementType::InternalMove.code(), "INTERNALMOVE");
        assert_eq!(MovementType::Transfer.number(), 4);
        assert_eq!(MovementType::DamageReport.number(), 6);
    }
}
