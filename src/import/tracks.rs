use std::collections::HashMap;

use log::warn;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, TransactionTrait,
};

use entities::track_local_model::TrackModel;
use entities::{album, track};

use super::parse::truncate;
use super::sheet::Sheet;
use super::{settle, ConflictPolicy, ImportOptions, ImportSummary, RowOutcome, PREVIEW_ROWS};

pub const ALBUM_TITLE: &str = "TitoloAlbum";
pub const ARTIST: &str = "Artista";
pub const COMPILATION_ARTIST: &str = "ArtistaCompilation";
pub const TITLE: &str = "Tracce";

pub async fn import_tracks(
    sheet: &Sheet,
    options: &ImportOptions,
    connection: &DatabaseConnection,
) -> Result<ImportSummary, DbErr> {
    let mut summary =
        ImportSummary::new("tracks", sheet.data_rows(options.limit), options.dry_run);
    if options.dry_run {
        summary.preview = sheet
            .records(options.limit)
            .take(PREVIEW_ROWS)
            .map(|record| {
                format!(
                    "{} ({} - {})",
                    record.text(TITLE).unwrap_or_default(),
                    record.text(ALBUM_TITLE).unwrap_or_default(),
                    record.text(ARTIST).unwrap_or_default()
                )
            })
            .collect();
        return Ok(summary);
    }

    // Next free position per album, starting from the tracks already stored.
    let mut positions: HashMap<i32, usize> = queries::track_counts(connection).await?;

    for record in sheet.records(options.limit) {
        let (Some(title), Some(album_title)) = (record.text(TITLE), record.text(ALBUM_TITLE))
        else {
            summary.skipped += 1;
            continue;
        };
        let artist = record.text(ARTIST);
        let compilation = record.text(COMPILATION_ARTIST);

        let album = match find_album(
            connection,
            &album_title,
            artist.as_deref(),
            compilation.as_deref(),
        )
        .await
        {
            Ok(Some(album)) => album,
            Ok(None) => {
                summary.missing_album += 1;
                summary.errors.push(format!(
                    "Album not found for '{}' ({} - {})",
                    title,
                    album_title,
                    artist.or(compilation).unwrap_or_default()
                ));
                continue;
            }
            Err(err) => {
                summary.errors.push(format!("Error with '{}': {}", title, err));
                summary.skipped += 1;
                continue;
            }
        };

        let title = truncate(&title, track::TITLE_MAX);
        let next = positions.get(&album.id).copied().unwrap_or(0) + 1;
        let outcome = match connection.begin().await {
            Ok(txn) => {
                let result = track_row(&txn, &title, album.id, next, options.policy).await;
                settle(txn, result).await
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(outcome) => {
                if outcome == RowOutcome::Created {
                    positions.insert(album.id, next);
                }
                summary.record(outcome);
            }
            Err(err) => {
                warn!("Line {}: {}", record.line, err);
                summary.errors.push(format!("Error with '{}': {}", title, err));
                summary.skipped += 1;
            }
        }
    }
    summary.total = track::Entity::find().count(connection).await?;
    Ok(summary)
}

/// Albums titled `title`, narrowed by the artist, then by the compilation
/// artist, then by title alone. Each step only counts when it leaves
/// exactly one album.
pub async fn find_album<C: ConnectionTrait>(
    db: &C,
    title: &str,
    artist: Option<&str>,
    compilation: Option<&str>,
) -> Result<Option<album::Model>, DbErr> {
    let candidates = queries::albums_titled(db, title).await?;
    for name in [artist, compilation].into_iter().flatten() {
        let mut by_artist = candidates
            .iter()
            .filter(|(_, owner)| owner.as_ref().map(|a| a.name.as_str()) == Some(name));
        if let (Some((album, _)), None) = (by_artist.next(), by_artist.next()) {
            return Ok(Some(album.clone()));
        }
    }
    match candidates.as_slice() {
        [(album, _)] => Ok(Some(album.clone())),
        _ => Ok(None),
    }
}

/// Existing tracks keep their position; the sheet carries no section,
/// credits or duration, so an update clears them.
async fn track_row<C: ConnectionTrait>(
    db: &C,
    title: &str,
    album_id: i32,
    position: usize,
    policy: ConflictPolicy,
) -> Result<RowOutcome, DbErr> {
    match queries::find_track(db, title, album_id).await? {
        Some(_) if policy == ConflictPolicy::Skip => Ok(RowOutcome::Skipped),
        Some(existing) => {
            let mut active: track::ActiveModel = existing.into();
            active.section = ActiveValue::Set(None);
            active.credits = ActiveValue::Set(None);
            active.duration = ActiveValue::Set(None);
            active.update(db).await?;
            Ok(RowOutcome::Updated)
        }
        None => {
            let mut active = TrackModel {
                title: title.to_string(),
                ordinal: Some(track::padded_ordinal(position)),
                ..Default::default()
            }
            .into_active_model();
            active.album_id = ActiveValue::Set(album_id);
            active.insert(db).await?;
            Ok(RowOutcome::Created)
        }
    }
}
