use std::cmp::Ordering;

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QueryOrder};

use entities::{album, artist};

use crate::catalog::track_counts;

/// Albums whose genre is exactly this (ignoring case) stay out of the report.
pub const EXCLUDED_GENRE: &str = "classica";

#[derive(Debug, Clone)]
pub struct ReportAlbum {
    pub album: album::Model,
    pub track_count: usize,
}

#[derive(Debug, Clone)]
pub struct ReportArtist {
    pub artist: artist::Model,
    pub albums: Vec<ReportAlbum>,
}

#[derive(Debug, Clone, Default)]
pub struct ArtistReport {
    pub artists: Vec<ReportArtist>,
    pub total_artists: usize,
    pub total_albums: usize,
}

pub async fn artist_report<C: ConnectionTrait>(db: &C) -> Result<ArtistReport, DbErr> {
    let artists = artist::Entity::find()
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?;
    let albums = album::Entity::find()
        .order_by_asc(album::Column::Id)
        .all(db)
        .await?;
    let counts = track_counts(db).await?;

    let mut included: Vec<album::Model> = albums.into_iter().filter(is_reported).collect();
    included.sort_by(report_order);
    let total_albums = included.len();

    let total_artists = artists.len();
    let artists = artists
        .into_iter()
        .map(|artist| {
            let albums = included
                .iter()
                .filter(|album| album.artist_id == artist.id)
                .map(|album| ReportAlbum {
                    album: album.clone(),
                    track_count: counts.get(&album.id).copied().unwrap_or(0),
                })
                .collect();
            ReportArtist { artist, albums }
        })
        .collect();

    Ok(ArtistReport {
        artists,
        total_artists,
        total_albums,
    })
}

pub fn is_reported(album: &album::Model) -> bool {
    !album
        .genre
        .as_deref()
        .map(|genre| genre.trim().eq_ignore_ascii_case(EXCLUDED_GENRE))
        .unwrap_or(false)
}

/// Non-classical genres first, then by release date with undated albums last.
pub fn report_order(a: &album::Model, b: &album::Model) -> Ordering {
    a.is_classical()
        .cmp(&b.is_classical())
        .then_with(|| match (a.release_date, b.release_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
