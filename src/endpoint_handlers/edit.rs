//! Staff pages that create, change and delete catalog records. The staff
//! gate runs as route middleware before any of these.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use log::info;
use sea_orm::{ActiveModelTrait, ActiveValue, IntoActiveModel, TransactionTrait};

use entities::{album, artist, track};

use crate::auth_middleware::Viewer;
use crate::error::AppError;
use crate::forms::{AlbumForm, ArtistForm, TrackForm};
use crate::responses::{forms, found};
use crate::AppState;

async fn load_artist(state: &AppState, artist_id: i32) -> Result<artist::Model, AppError> {
    queries::get_artist(&state.connection, artist_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No artist with id {}", artist_id)))
}

async fn load_album(state: &AppState, album_id: i32) -> Result<album::Model, AppError> {
    queries::get_album(&state.connection, album_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No album with id {}", album_id)))
}

async fn load_track(state: &AppState, track_id: i32) -> Result<track::Model, AppError> {
    queries::get_track(&state.connection, track_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No track with id {}", track_id)))
}

fn done(state: &AppState, viewer: &Viewer, message: String, location: &str) -> Response {
    info!("{}", message);
    state.flashes.push(viewer.session(), message);
    found(location)
}

pub async fn new_artist_page(viewer: Viewer) -> Html<String> {
    forms::artist_form(
        "New artist",
        &viewer,
        "/artist/new",
        "/artists",
        &ArtistForm::default(),
        &[],
    )
}

pub async fn create_artist(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<ArtistForm>,
) -> Result<Response, AppError> {
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(forms::artist_form(
                "New artist",
                &viewer,
                "/artist/new",
                "/artists",
                &form,
                &errors,
            )
            .into_response())
        }
    };
    let artist = artist::ActiveModel {
        name: ActiveValue::Set(fields.name),
        profile: ActiveValue::Set(fields.profile),
        sites: ActiveValue::Set(fields.sites),
        members: ActiveValue::Set(fields.members),
        ..Default::default()
    }
    .insert(&state.connection)
    .await?;
    Ok(done(
        &state,
        &viewer,
        format!("Artist \"{}\" created.", artist.name),
        &format!("/artist/{}", artist.id),
    ))
}

pub async fn edit_artist_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(artist_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let artist = load_artist(&state, artist_id).await?;
    Ok(forms::artist_form(
        &format!("Edit {}", artist.name),
        &viewer,
        &format!("/artist/{}/edit", artist.id),
        &format!("/artist/{}", artist.id),
        &ArtistForm::from(&artist),
        &[],
    ))
}

pub async fn update_artist(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(artist_id): Path<i32>,
    Form(form): Form<ArtistForm>,
) -> Result<Response, AppError> {
    let artist = load_artist(&state, artist_id).await?;
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(forms::artist_form(
                &format!("Edit {}", artist.name),
                &viewer,
                &format!("/artist/{}/edit", artist.id),
                &format!("/artist/{}", artist.id),
                &form,
                &errors,
            )
            .into_response())
        }
    };
    let mut active: artist::ActiveModel = artist.into();
    active.name = ActiveValue::Set(fields.name);
    active.profile = ActiveValue::Set(fields.profile);
    active.sites = ActiveValue::Set(fields.sites);
    active.members = ActiveValue::Set(fields.members);
    let artist = active.update(&state.connection).await?;
    Ok(done(
        &state,
        &viewer,
        format!("Artist \"{}\" updated.", artist.name),
        &format!("/artist/{}", artist.id),
    ))
}

pub async fn delete_artist_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(artist_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let (artist, albums) = queries::get_artist_with_albums(&state.connection, artist_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No artist with id {}", artist_id)))?;
    Ok(forms::confirm_delete(
        &format!("Delete {}", artist.name),
        &viewer,
        &format!(
            "Delete the artist \"{}\" together with {} albums and all their tracks?",
            artist.name,
            albums.len()
        ),
        &format!("/artist/{}/delete", artist.id),
        &format!("/artist/{}", artist.id),
    ))
}

pub async fn delete_artist(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(artist_id): Path<i32>,
) -> Result<Response, AppError> {
    let (artist, albums, tracks) = queries::delete_artist(&state.connection, artist_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No artist with id {}", artist_id)))?;
    Ok(done(
        &state,
        &viewer,
        format!(
            "Artist \"{}\", {} albums and {} tracks deleted.",
            artist.name, albums, tracks
        ),
        "/artists",
    ))
}

pub async fn new_album_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(artist_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let artist = load_artist(&state, artist_id).await?;
    Ok(forms::album_form(
        &format!("New album for {}", artist.name),
        &viewer,
        &format!("/artist/{}/album/new", artist.id),
        &format!("/artist/{}", artist.id),
        &AlbumForm::default(),
        &[],
    ))
}

pub async fn create_album(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(artist_id): Path<i32>,
    Form(form): Form<AlbumForm>,
) -> Result<Response, AppError> {
    let artist = load_artist(&state, artist_id).await?;
    let (fields, styles) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(forms::album_form(
                &format!("New album for {}", artist.name),
                &viewer,
                &format!("/artist/{}/album/new", artist.id),
                &format!("/artist/{}", artist.id),
                &form,
                &errors,
            )
            .into_response())
        }
    };
    let txn = state.connection.begin().await?;
    let mut active = fields.into_active_model();
    active.artist_id = ActiveValue::Set(artist.id);
    let album = active.insert(&txn).await?;
    queries::set_album_styles(&txn, album.id, &styles).await?;
    txn.commit().await?;
    Ok(done(
        &state,
        &viewer,
        format!("Album \"{}\" created.", album.title),
        &format!("/album/{}", album.id),
    ))
}

pub async fn edit_album_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(album_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let album = load_album(&state, album_id).await?;
    let styles = queries::album_styles(&state.connection, &album).await?;
    Ok(forms::album_form(
        &format!("Edit {}", album.title),
        &viewer,
        &format!("/album/{}/edit", album.id),
        &format!("/album/{}", album.id),
        &AlbumForm::from_album(&album, &styles),
        &[],
    ))
}

pub async fn update_album(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(album_id): Path<i32>,
    Form(form): Form<AlbumForm>,
) -> Result<Response, AppError> {
    let album = load_album(&state, album_id).await?;
    let (fields, styles) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(forms::album_form(
                &format!("Edit {}", album.title),
                &viewer,
                &format!("/album/{}/edit", album.id),
                &format!("/album/{}", album.id),
                &form,
                &errors,
            )
            .into_response())
        }
    };
    let txn = state.connection.begin().await?;
    let mut active = fields.into_active_model();
    active.id = ActiveValue::Unchanged(album.id);
    let album = active.update(&txn).await?;
    queries::set_album_styles(&txn, album.id, &styles).await?;
    txn.commit().await?;
    Ok(done(
        &state,
        &viewer,
        format!("Album \"{}\" updated.", album.title),
        &format!("/album/{}", album.id),
    ))
}

pub async fn delete_album_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(album_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let album = load_album(&state, album_id).await?;
    let tracks = queries::count_tracks(&state.connection, album.id).await?;
    Ok(forms::confirm_delete(
        &format!("Delete {}", album.title),
        &viewer,
        &format!(
            "Delete the album \"{}\" and its {} tracks?",
            album.title, tracks
        ),
        &format!("/album/{}/delete", album.id),
        &format!("/album/{}", album.id),
    ))
}

pub async fn delete_album(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(album_id): Path<i32>,
) -> Result<Response, AppError> {
    let (album, tracks) = queries::delete_album(&state.connection, album_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No album with id {}", album_id)))?;
    Ok(done(
        &state,
        &viewer,
        format!("Album \"{}\" and {} tracks deleted.", album.title, tracks),
        &format!("/artist/{}", album.artist_id),
    ))
}

pub async fn new_track_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(album_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let album = load_album(&state, album_id).await?;
    let next = queries::count_tracks(&state.connection, album.id).await? as usize + 1;
    let form = TrackForm {
        ordinal: track::padded_ordinal(next),
        ..Default::default()
    };
    Ok(forms::track_form(
        &format!("New track on {}", album.title),
        &viewer,
        &format!("/album/{}/track/new", album.id),
        &format!("/album/{}", album.id),
        &form,
        &[],
    ))
}

pub async fn create_track(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(album_id): Path<i32>,
    Form(form): Form<TrackForm>,
) -> Result<Response, AppError> {
    let album = load_album(&state, album_id).await?;
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(forms::track_form(
                &format!("New track on {}", album.title),
                &viewer,
                &format!("/album/{}/track/new", album.id),
                &format!("/album/{}", album.id),
                &form,
                &errors,
            )
            .into_response())
        }
    };
    let mut active = fields.into_active_model();
    active.album_id = ActiveValue::Set(album.id);
    let track = active.insert(&state.connection).await?;
    Ok(done(
        &state,
        &viewer,
        format!("Track \"{}\" added to \"{}\".", track.title, album.title),
        &format!("/album/{}", album.id),
    ))
}

pub async fn edit_track_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(track_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let track = load_track(&state, track_id).await?;
    Ok(forms::track_form(
        &format!("Edit {}", track.title),
        &viewer,
        &format!("/track/{}/edit", track.id),
        &format!("/album/{}", track.album_id),
        &TrackForm::from(&track),
        &[],
    ))
}

pub async fn update_track(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(track_id): Path<i32>,
    Form(form): Form<TrackForm>,
) -> Result<Response, AppError> {
    let track = load_track(&state, track_id).await?;
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(forms::track_form(
                &format!("Edit {}", track.title),
                &viewer,
                &format!("/track/{}/edit", track.id),
                &format!("/album/{}", track.album_id),
                &form,
                &errors,
            )
            .into_response())
        }
    };
    let mut active = fields.into_active_model();
    active.id = ActiveValue::Unchanged(track.id);
    let track = active.update(&state.connection).await?;
    Ok(done(
        &state,
        &viewer,
        format!("Track \"{}\" updated.", track.title),
        &format!("/album/{}", track.album_id),
    ))
}

pub async fn delete_track_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(track_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let track = load_track(&state, track_id).await?;
    Ok(forms::confirm_delete(
        &format!("Delete {}", track.title),
        &viewer,
        &format!("Delete the track \"{}\"?", track.title),
        &format!("/track/{}/delete", track.id),
        &format!("/album/{}", track.album_id),
    ))
}

pub async fn delete_track(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(track_id): Path<i32>,
) -> Result<Response, AppError> {
    let track = queries::delete_track(&state.connection, track_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No track with id {}", track_id)))?;
    Ok(done(
        &state,
        &viewer,
        format!("Track \"{}\" deleted.", track.title),
        &format!("/album/{}", track.album_id),
    ))
}
