use log::{error, info};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use entities::user_local_model::UserModel;

use crate::config::SuperuserConfig;
use crate::error::AppError;
use crate::passwords::hash_password;

/// Guards one-time startup work: schema migration and the seed superuser.
pub struct Bootstrap {
    done: Mutex<bool>,
}

static PROCESS_BOOTSTRAP: Bootstrap = Bootstrap::new();

/// Runs startup initialization at most once per process.
pub async fn ensure_initialized(db: &DatabaseConnection, superuser: Option<&SuperuserConfig>) {
    PROCESS_BOOTSTRAP.run(db, superuser).await;
}

impl Bootstrap {
    pub const fn new() -> Self {
        Bootstrap {
            done: Mutex::const_new(false),
        }
    }

    /// Returns whether initialization has completed. Failures are logged and
    /// leave the guard unset, so a later call tries again.
    pub async fn run(&self, db: &DatabaseConnection, superuser: Option<&SuperuserConfig>) -> bool {
        let mut done = self.done.lock().await;
        if *done {
            return true;
        }
        match initialize(db, superuser).await {
            Ok(()) => {
                *done = true;
                true
            }
            Err(err) => {
                error!("Startup initialization failed: {}", err);
                false
            }
        }
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Bootstrap::new()
    }
}

async fn initialize(
    db: &DatabaseConnection,
    superuser: Option<&SuperuserConfig>,
) -> Result<(), AppError> {
    info!("Running migrations");
    Migrator::up(db, None).await?;
    if let Some(superuser) = superuser {
        seed_superuser(db, superuser).await?;
    }
    Ok(())
}

async fn seed_superuser(db: &DatabaseConnection, superuser: &SuperuserConfig) -> Result<(), AppError> {
    if queries::get_user_by_username(db, &superuser.username)
        .await?
        .is_some()
    {
        return Ok(());
    }
    queries::add_user(
        db,
        UserModel {
            username: superuser.username.to_owned(),
            email: superuser.email.to_owned(),
            password: hash_password(&superuser.password)?,
            is_staff: true,
            is_superuser: true,
            date_joined: chrono::Utc::now().naive_utc(),
        },
    )
    .await?;
    info!("Created superuser {}", superuser.username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectOptions, Database, EntityTrait, PaginatorTrait};

    use super::*;

    async fn blank_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::connect(options).await.unwrap()
    }

    fn admin() -> SuperuserConfig {
        SuperuserConfig {
            username: "admin".to_string(),
            password: "changeme123".to_string(),
            email: "admin@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn migrates_and_seeds_once() {
        let db = blank_db().await;
        let guard = Bootstrap::new();
        assert!(guard.run(&db, Some(&admin())).await);
        assert!(guard.run(&db, Some(&admin())).await);

        let users = entities::prelude::User::find().count(&db).await.unwrap();
        assert_eq!(users, 1);
        let admin = queries::get_user_by_username(&db, "admin").await.unwrap().unwrap();
        assert!(admin.is_staff && admin.is_superuser);
    }

    #[tokio::test]
    async fn failures_are_swallowed_and_retried() {
        let db = blank_db().await;
        db.clone().close().await.unwrap();
        let guard = Bootstrap::new();
        assert!(!guard.run(&db, None).await);
        assert!(!*guard.done.lock().await);
    }
}
