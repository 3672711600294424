//! Data access for the catalog, shared by the web handlers, the import
//! commands and the report.

pub mod accounts;
pub mod catalog;
pub mod report;
pub mod search;
pub mod styles;

pub use accounts::*;
pub use catalog::*;
pub use report::*;
pub use search::*;
pub use styles::*;

#[cfg(test)]
pub(crate) mod test_db {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    pub async fn connect() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }
}
