pub use sea_orm_migration::prelude::*;

mod m20250101_000001_hr_core;
mod m20250101_000002_hr_operations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_hr_core::Migration),
            Box::new(m20250101_000002_hr_operations::Migration),
        ]
    }
}
