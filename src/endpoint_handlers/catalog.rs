use axum::extract::{Path, State};
use axum::response::Html;

use crate::auth_middleware::Viewer;
use crate::error::AppError;
use crate::responses::pages;
use crate::AppState;

pub async fn home(State(state): State<AppState>, viewer: Viewer) -> Result<Html<String>, AppError> {
    let artists = queries::list_artists(&state.connection).await?;
    let messages = state.flashes.take(viewer.session());
    Ok(pages::home(&viewer, &messages, &artists))
}

pub async fn artists(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Html<String>, AppError> {
    let artists = queries::list_artists(&state.connection).await?;
    let messages = state.flashes.take(viewer.session());
    Ok(pages::artists(&viewer, &messages, &artists))
}

pub async fn albums(State(state): State<AppState>, viewer: Viewer) -> Result<Html<String>, AppError> {
    let albums = queries::list_albums(&state.connection).await?;
    let messages = state.flashes.take(viewer.session());
    Ok(pages::albums(&viewer, &messages, &albums))
}

pub async fn artist(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(artist_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let (artist, albums) = queries::get_artist_with_albums(&state.connection, artist_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No artist with id {}", artist_id)))?;
    let messages = state.flashes.take(viewer.session());
    Ok(pages::artist(&viewer, &messages, &artist, &albums))
}

pub async fn album(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(album_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let detail = queries::get_album_detail(&state.connection, album_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No album with id {}", album_id)))?;
    let messages = state.flashes.take(viewer.session());
    Ok(pages::album(&viewer, &messages, &detail))
}
