pub use sea_orm_migration::prelude::*;

mod m20240510_000001_create_catalog;
mod m20240512_000002_create_styles;
mod m20240520_000003_create_accounts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240510_000001_create_catalog::Migration),
            Box::new(m20240512_000002_create_styles::Migration),
            Box::new(m20240520_000003_create_accounts::Migration),
        ]
    }
}
