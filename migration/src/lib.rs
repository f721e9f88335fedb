pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_core_tables;
mod m20250301_000002_create_teaching_tables;
mod m20250301_000003_create_bulletin_tables;
mod m20250301_000004_create_communication_tables;
mod m20250301_000005_create_geolocation_tables;
mod m20250301_000006_create_system_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_core_tables::Migration),
            Box::new(m20250301_000002_create_teaching_tables::Migration),
            Box::new(m20250301_000003_create_bulletin_tables::Migration),
            Box::new(m20250301_000004_create_communication_tables::Migration),
            Box::new(m20250301_000005_create_geolocation_tables::Migration),
            Box::new(m20250301_000006_create_system_settings::Migration),
        ]
    }
}
