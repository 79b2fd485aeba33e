use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_clients_table::Clients;
use crate::m20250301_000003_create_locations_table::Locations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lots::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Lots::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Lots::LocationId).uuid().null())
                    .col(ColumnDef::new(Lots::Reference).string_len(100).not_null())
                    .col(ColumnDef::new(Lots::Description).string_len(500).null())
                    .col(ColumnDef::new(Lots::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Lots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lots_client_id")
                            .from(Lots::Table, Lots::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lots_location_id")
                            .from(Lots::Table, Lots::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lots_client_id")
                    .table(Lots::Table)
                    .col(Lots::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lots_location_id")
                    .table(Lots::Table)
                    .col(Lots::LocationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Lots {
    Table,
    Id,
    ClientId,
    LocationId,
    Reference,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
}
