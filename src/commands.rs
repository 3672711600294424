//! The work behind each CLI subcommand, returning the text to print.

use std::path::Path;

use log::info;
use sea_orm::DatabaseConnection;

use entities::user_local_model::UserModel;

use crate::error::AppError;
use crate::import::{self, ImportOptions, Sheet};
use crate::media_sync::{self, MediaOptions};
use crate::passwords::hash_password;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportKind {
    Artists,
    Albums,
    Tracks,
}

pub async fn run_import(
    connection: &DatabaseConnection,
    kind: ImportKind,
    file: &Path,
    options: &ImportOptions,
) -> Result<String, AppError> {
    if !file.is_file() {
        return Err(AppError::BadRequest(format!(
            "spreadsheet not found: {}",
            file.display()
        )));
    }
    info!("Reading {}", file.display());
    let sheet = Sheet::read(file)?;
    info!("Worksheet: {}", sheet.name);
    if sheet.headers.is_empty() && sheet.rows.is_empty() {
        return Ok("No data found in the file".to_string());
    }
    let summary = match kind {
        ImportKind::Artists => import::import_artists(&sheet, options, connection).await?,
        ImportKind::Albums => import::import_albums(&sheet, options, connection).await?,
        ImportKind::Tracks => import::import_tracks(&sheet, options, connection).await?,
    };
    Ok(summary.to_string())
}

pub async fn run_artist_photos(
    connection: &DatabaseConnection,
    media_root: &Path,
    options: &MediaOptions,
) -> Result<String, AppError> {
    let summary = media_sync::load_artist_photos(connection, media_root, options).await?;
    Ok(summary.to_string())
}

pub async fn run_album_covers(
    connection: &DatabaseConnection,
    media_root: &Path,
    options: &MediaOptions,
) -> Result<String, AppError> {
    let summary = media_sync::load_album_covers(connection, media_root, options).await?;
    Ok(summary.to_string())
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub staff: bool,
    pub superuser: bool,
}

/// Superusers are always staff.
pub async fn create_user(connection: &DatabaseConnection, new: NewUser<'_>) -> Result<String, AppError> {
    if queries::get_user_by_username(connection, new.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(format!(
            "user {} already exists",
            new.username
        )));
    }
    let user = queries::add_user(
        connection,
        UserModel {
            username: new.username.to_string(),
            email: new.email.to_string(),
            password: hash_password(new.password)?,
            is_staff: new.staff || new.superuser,
            is_superuser: new.superuser,
            date_joined: chrono::Utc::now().naive_utc(),
        },
    )
    .await?;
    Ok(format!("Created user {} (id {})", user.username, user.id))
}
