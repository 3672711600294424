use std::cmp::Ordering;
use std::collections::HashMap;

use log::info;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, ModelTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use entities::{album, album_style, artist, style, track};

/// An artist row for list pages.
#[derive(Debug, Clone)]
pub struct ArtistSummary {
    pub artist: artist::Model,
    pub album_count: usize,
    pub closed_count: usize,
}

#[derive(Debug, Clone)]
pub struct AlbumDetail {
    pub album: album::Model,
    pub artist: artist::Model,
    pub styles: Vec<style::Model>,
    pub tracks: Vec<track::Model>,
}

pub async fn list_artists<C: ConnectionTrait>(db: &C) -> Result<Vec<ArtistSummary>, DbErr> {
    let artists = artist::Entity::find()
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?;
    let albums = album::Entity::find().all(db).await?;
    let mut counts: HashMap<i32, (usize, usize)> = HashMap::new();
    for album in albums {
        let entry = counts.entry(album.artist_id).or_default();
        entry.0 += 1;
        if album.closed {
            entry.1 += 1;
        }
    }
    Ok(artists
        .into_iter()
        .map(|artist| {
            let (album_count, closed_count) = counts.get(&artist.id).copied().unwrap_or_default();
            ArtistSummary {
                artist,
                album_count,
                closed_count,
            }
        })
        .collect())
}

/// Albums ordered by artist name, then release date.
pub async fn list_albums<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<(album::Model, Option<artist::Model>)>, DbErr> {
    album::Entity::find()
        .find_also_related(artist::Entity)
        .order_by_asc(artist::Column::Name)
        .order_by(album::Column::ReleaseDate, Order::Asc)
        .order_by_asc(album::Column::Id)
        .all(db)
        .await
}

pub async fn get_artist<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
) -> Result<Option<artist::Model>, DbErr> {
    artist::Entity::find_by_id(artist_id).one(db).await
}

/// First artist with exactly this name. Names are not unique; the oldest
/// row wins.
pub async fn get_artist_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<artist::Model>, DbErr> {
    artist::Entity::find()
        .filter(artist::Column::Name.eq(name))
        .order_by_asc(artist::Column::Id)
        .one(db)
        .await
}

/// Every artist in id order, optionally capped.
pub async fn artists_by_id<C: ConnectionTrait>(
    db: &C,
    limit: Option<u64>,
) -> Result<Vec<artist::Model>, DbErr> {
    artist::Entity::find()
        .order_by_asc(artist::Column::Id)
        .limit(limit)
        .all(db)
        .await
}

pub async fn set_artist_photo<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
    photo: Option<String>,
) -> Result<(), DbErr> {
    artist::Entity::update_many()
        .col_expr(artist::Column::Photo, Expr::value(photo))
        .filter(artist::Column::Id.eq(artist_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Empties every artist photo field; returns how many rows had one.
pub async fn clear_artist_photos<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let result = artist::Entity::update_many()
        .col_expr(artist::Column::Photo, Expr::value(Option::<String>::None))
        .filter(artist::Column::Photo.is_not_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// The artist and its discography, newest first.
pub async fn get_artist_with_albums<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
) -> Result<Option<(artist::Model, Vec<album::Model>)>, DbErr> {
    let Some(artist) = artist::Entity::find_by_id(artist_id).one(db).await? else {
        return Ok(None);
    };
    let albums = artist
        .find_related(album::Entity)
        .order_by_desc(album::Column::ReleaseDate)
        .order_by_asc(album::Column::Title)
        .all(db)
        .await?;
    Ok(Some((artist, albums)))
}

pub async fn get_album<C: ConnectionTrait>(
    db: &C,
    album_id: i32,
) -> Result<Option<album::Model>, DbErr> {
    album::Entity::find_by_id(album_id).one(db).await
}

/// Albums with this exact title, with their artists.
pub async fn albums_titled<C: ConnectionTrait>(
    db: &C,
    title: &str,
) -> Result<Vec<(album::Model, Option<artist::Model>)>, DbErr> {
    album::Entity::find()
        .find_also_related(artist::Entity)
        .filter(album::Column::Title.eq(title))
        .order_by_asc(album::Column::Id)
        .all(db)
        .await
}

pub async fn find_album<C: ConnectionTrait>(
    db: &C,
    title: &str,
    artist_id: i32,
) -> Result<Option<album::Model>, DbErr> {
    album::Entity::find()
        .filter(album::Column::Title.eq(title))
        .filter(album::Column::ArtistId.eq(artist_id))
        .order_by_asc(album::Column::Id)
        .one(db)
        .await
}

/// Every album in id order with its artist, optionally capped.
pub async fn albums_by_id<C: ConnectionTrait>(
    db: &C,
    limit: Option<u64>,
) -> Result<Vec<(album::Model, Option<artist::Model>)>, DbErr> {
    album::Entity::find()
        .find_also_related(artist::Entity)
        .order_by_asc(album::Column::Id)
        .limit(limit)
        .all(db)
        .await
}

pub async fn set_album_cover<C: ConnectionTrait>(
    db: &C,
    album_id: i32,
    cover: Option<String>,
) -> Result<(), DbErr> {
    album::Entity::update_many()
        .col_expr(album::Column::Cover, Expr::value(cover))
        .filter(album::Column::Id.eq(album_id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn get_album_detail<C: ConnectionTrait>(
    db: &C,
    album_id: i32,
) -> Result<Option<AlbumDetail>, DbErr> {
    let Some((album, Some(artist))) = album::Entity::find_by_id(album_id)
        .find_also_related(artist::Entity)
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    let styles = album
        .find_related(style::Entity)
        .order_by_asc(style::Column::Name)
        .all(db)
        .await?;
    let tracks = tracks_of_album(db, album.id).await?;
    Ok(Some(AlbumDetail {
        album,
        artist,
        styles,
        tracks,
    }))
}

/// Tracks of an album ordered by section, then ordinal.
pub async fn tracks_of_album<C: ConnectionTrait>(
    db: &C,
    album_id: i32,
) -> Result<Vec<track::Model>, DbErr> {
    let mut tracks = track::Entity::find()
        .filter(track::Column::AlbumId.eq(album_id))
        .order_by_asc(track::Column::Id)
        .all(db)
        .await?;
    tracks.sort_by_cached_key(track_order_key);
    Ok(tracks)
}

/// Sort key for tracks: section, then numeric ordinals in numeric order,
/// then every other ordinal as text. Numeric ordinals never compare as
/// text, so `9`, `10` and `1a` keep a single consistent order.
pub fn track_order_key(track: &track::Model) -> (String, bool, u32, String) {
    let section = track.section.clone().unwrap_or_default();
    let ordinal = track.ordinal.as_deref().unwrap_or("").trim();
    match ordinal.parse::<u32>() {
        Ok(position) => (section, false, position, ordinal.to_string()),
        Err(_) => (section, true, 0, ordinal.to_string()),
    }
}

pub fn compare_tracks(a: &track::Model, b: &track::Model) -> Ordering {
    track_order_key(a).cmp(&track_order_key(b))
}

pub async fn get_track<C: ConnectionTrait>(
    db: &C,
    track_id: i32,
) -> Result<Option<track::Model>, DbErr> {
    track::Entity::find_by_id(track_id).one(db).await
}

pub async fn find_track<C: ConnectionTrait>(
    db: &C,
    title: &str,
    album_id: i32,
) -> Result<Option<track::Model>, DbErr> {
    track::Entity::find()
        .filter(track::Column::Title.eq(title))
        .filter(track::Column::AlbumId.eq(album_id))
        .order_by_asc(track::Column::Id)
        .one(db)
        .await
}

pub async fn count_tracks<C: ConnectionTrait>(db: &C, album_id: i32) -> Result<u64, DbErr> {
    track::Entity::find()
        .filter(track::Column::AlbumId.eq(album_id))
        .count(db)
        .await
}

#[derive(Debug, FromQueryResult)]
struct AlbumTrackCount {
    album_id: i32,
    total: i64,
}

/// Number of tracks per album, for albums that have any.
pub async fn track_counts<C: ConnectionTrait>(db: &C) -> Result<HashMap<i32, usize>, DbErr> {
    let rows = track::Entity::find()
        .select_only()
        .column(track::Column::AlbumId)
        .column_as(
            SimpleExpr::from(Func::count(Expr::col(track::Column::Id))),
            "total",
        )
        .group_by(track::Column::AlbumId)
        .into_model::<AlbumTrackCount>()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| (row.album_id, row.total as usize))
        .collect())
}

pub async fn delete_track<C: ConnectionTrait>(
    db: &C,
    track_id: i32,
) -> Result<Option<track::Model>, DbErr> {
    let Some(track) = track::Entity::find_by_id(track_id).one(db).await? else {
        return Ok(None);
    };
    track.clone().delete(db).await?;
    Ok(Some(track))
}

/// Removes the album with its tracks and style links. Returns the album and
/// how many tracks went with it.
pub async fn delete_album<C>(db: &C, album_id: i32) -> Result<Option<(album::Model, u64)>, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let Some(album) = album::Entity::find_by_id(album_id).one(&txn).await? else {
        return Ok(None);
    };
    let tracks = remove_album_children(&txn, album.id).await?;
    album.clone().delete(&txn).await?;
    txn.commit().await?;
    info!("Deleted album {} with {} tracks", album.id, tracks);
    Ok(Some((album, tracks)))
}

/// Removes the artist with every album and track below it. Returns the
/// artist plus the number of albums and tracks removed.
pub async fn delete_artist<C>(
    db: &C,
    artist_id: i32,
) -> Result<Option<(artist::Model, u64, u64)>, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let Some(artist) = artist::Entity::find_by_id(artist_id).one(&txn).await? else {
        return Ok(None);
    };
    let albums = artist.find_related(album::Entity).all(&txn).await?;
    let mut tracks = 0;
    for album in &albums {
        tracks += remove_album_children(&txn, album.id).await?;
    }
    album::Entity::delete_many()
        .filter(album::Column::ArtistId.eq(artist.id))
        .exec(&txn)
        .await?;
    artist.clone().delete(&txn).await?;
    txn.commit().await?;
    info!(
        "Deleted artist {} with {} albums and {} tracks",
        artist.id,
        albums.len(),
        tracks
    );
    Ok(Some((artist, albums.len() as u64, tracks)))
}

async fn remove_album_children<C: ConnectionTrait>(db: &C, album_id: i32) -> Result<u64, DbErr> {
    album_style::Entity::delete_many()
        .filter(album_style::Column::AlbumId.eq(album_id))
        .exec(db)
        .await?;
    let deleted = track::Entity::delete_many()
        .filter(track::Column::AlbumId.eq(album_id))
        .exec(db)
        .await?;
    Ok(deleted.rows_affected)
}
