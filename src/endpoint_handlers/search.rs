use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use log::info;
use serde::Deserialize;

use crate::auth_middleware::Viewer;
use crate::error::AppError;
use crate::responses::pages;
use crate::responses::search_response::SearchResponse;
use crate::AppState;

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub async fn search_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, AppError> {
    let results = queries::search(&state.connection, &query.q).await?;
    let messages = state.flashes.take(viewer.session());
    Ok(pages::search(&viewer, &messages, &results))
}

pub async fn search_json(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let results = queries::search(&state.connection, &query.q).await?;
    info!(
        "Search '{}': {} artists, {} albums, {} tracks",
        query.q,
        results.artists.len(),
        results.albums.len(),
        results.tracks.len()
    );
    Ok(Json(SearchResponse::from(results)))
}
