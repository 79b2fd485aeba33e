pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_clients_table;
mod m20250301_000002_create_warehouses_table;
mod m20250301_000003_create_locations_table;
mod m20250301_000004_create_lots_table;
mod m20250301_000005_create_movements_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_clients_table::Migration),
            Box::new(m20250301_000002_create_warehouses_table::Migration),
            Box::new(m20250301_000003_create_locations_table::Migration),
            Box::new(m20250301_000004_create_lots_table::Migration),
            Box::new(m20250301_000005_create_movements_table::Migration),
        ]
    }
}
