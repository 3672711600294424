use std::path::PathBuf;

use axum::routing::{get, post};
use axum::{middleware, Router};
use sea_orm::DatabaseConnection;
use tower_http::services::ServeDir;

use crate::auth_middleware::require_staff;
use crate::endpoint_handlers::{accounts, catalog, edit, report, search};
use crate::flash::FlashStore;

pub mod auth_middleware;
pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod endpoint_handlers;
pub mod error;
pub mod explorer;
pub mod flash;
pub mod forms;
pub mod import;
pub mod media_sync;
pub mod passwords;
pub mod pdf_report;
pub mod responses;

#[derive(Clone)]
pub struct AppState {
    pub connection: DatabaseConnection,
    pub media_root: PathBuf,
    pub flashes: FlashStore,
}

impl AppState {
    pub fn new(connection: DatabaseConnection, media_root: PathBuf) -> Self {
        AppState {
            connection,
            media_root,
            flashes: FlashStore::default(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let staff: Router<AppState> = Router::new()
        .route("/artist/new", get(edit::new_artist_page).post(edit::create_artist))
        .route(
            "/artist/:id/edit",
            get(edit::edit_artist_page).post(edit::update_artist),
        )
        .route(
            "/artist/:id/delete",
            get(edit::delete_artist_page).post(edit::delete_artist),
        )
        .route(
            "/artist/:id/album/new",
            get(edit::new_album_page).post(edit::create_album),
        )
        .route(
            "/album/:id/edit",
            get(edit::edit_album_page).post(edit::update_album),
        )
        .route(
            "/album/:id/delete",
            get(edit::delete_album_page).post(edit::delete_album),
        )
        .route(
            "/album/:id/track/new",
            get(edit::new_track_page).post(edit::create_track),
        )
        .route(
            "/track/:id/edit",
            get(edit::edit_track_page).post(edit::update_track),
        )
        .route(
            "/track/:id/delete",
            get(edit::delete_track_page).post(edit::delete_track),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));

    Router::new()
        .route("/", get(catalog::home))
        .route("/artists", get(catalog::artists))
        .route("/albums", get(catalog::albums))
        .route("/artist/:id", get(catalog::artist))
        .route("/album/:id", get(catalog::album))
        .route("/search", get(search::search_page))
        .route("/api/search", get(search::search_json))
        .route("/report/artists.pdf", get(report::artists_pdf))
        .route(
            "/register",
            get(accounts::register_page).post(accounts::register),
        )
        .route("/login", get(accounts::login_page).post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/users", get(accounts::users))
        .route("/user/:username", get(accounts::profile))
        .merge(staff)
        .nest_service("/media", ServeDir::new(state.media_root.clone()))
        .with_state(state)
}
