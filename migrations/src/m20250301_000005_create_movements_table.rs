use sea_orm_migration::prelude::*;

use crate::m20250301_000004_create_lots_table::Lots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movements::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Movements::LotId).uuid().not_null())
                    .col(ColumnDef::new(Movements::Type).string_len(20).not_null())
                    .col(ColumnDef::new(Movements::FromLocationId).uuid().null())
                    .col(ColumnDef::new(Movements::ToLocationId).uuid().null())
                    .col(
                        ColumnDef::new(Movements::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Movements::PerformedBy).uuid().not_null())
                    .col(ColumnDef::new(Movements::Reason).string_len(500).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movements_lot_id")
                            .from(Movements::Table, Movements::LotId)
                            .to(Lots::Table, Lots::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movements_lot_occurred")
                    .table(Movements::Table)
                    .col(Movements::LotId)
                    .col((Movements::OccurredAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movements::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Movements {
    Table,
    Id,
    LotId,
    Type,
    FromLocationId,
    ToLocationId,
    OccurredAt,
    PerformedBy,
    Reason,
}
