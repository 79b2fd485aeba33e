use sea_orm_migration::prelude::*;

use crate::m20250301_000002_create_warehouses_table::Warehouses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Locations::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(Locations::Code).string_len(50).not_null())
                    .col(ColumnDef::new(Locations::Label).string_len(200).null())
                    .col(ColumnDef::new(Locations::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Locations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Locations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_locations_warehouse_id")
                            .from(Locations::Table, Locations::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Code is unique per warehouse by convention only, so this index is not unique.
        manager
            .create_index(
                Index::create()
                    .name("idx_locations_warehouse_code")
                    .table(Locations::Table)
                    .col(Locations::WarehouseId)
                    .col(Locations::Code)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Locations {
    Table,
    Id,
    WarehouseId,
    Code,
    Label,
    Status,
    CreatedAt,
    UpdatedAt,
}
