use log::{debug, warn};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, TransactionTrait,
};

use entities::album_local_model::AlbumModel;
use entities::{album, artist, style};

use super::parse::{limited, parse_bool, parse_date, parse_float, parse_styles, truncate};
use super::sheet::{Record, Sheet};
use super::{settle, ConflictPolicy, ImportOptions, ImportSummary, RowOutcome, PREVIEW_ROWS};

pub const TITLE: &str = "titolo_album";
pub const ARTIST: &str = "artista_appartenenza";
pub const LABEL: &str = "editore";
pub const CATALOG_NUMBER: &str = "catalogo";
pub const FORMAT: &str = "supporto";
pub const STORAGE: &str = "deposito";
pub const NOTES: &str = "note";
pub const COST: &str = "costo";
pub const CLOSED: &str = "closed";
pub const RELEASE_DATE: &str = "data_rilascio";
pub const STYLES: &str = "stili";

pub async fn import_albums(
    sheet: &Sheet,
    options: &ImportOptions,
    connection: &DatabaseConnection,
) -> Result<ImportSummary, DbErr> {
    let mut summary =
        ImportSummary::new("albums", sheet.data_rows(options.limit), options.dry_run);
    if options.dry_run {
        summary.preview = sheet
            .records(options.limit)
            .take(PREVIEW_ROWS)
            .map(|record| {
                format!(
                    "{} - {}",
                    record.text(TITLE).unwrap_or_default(),
                    record.text(ARTIST).unwrap_or_default()
                )
            })
            .collect();
        return Ok(summary);
    }

    for record in sheet.records(options.limit) {
        let (Some(title), Some(artist_name)) = (record.text(TITLE), record.text(ARTIST)) else {
            debug!("Line {} has no title or artist", record.line);
            summary.skipped += 1;
            continue;
        };
        let outcome = match connection.begin().await {
            Ok(txn) => {
                let result = album_row(&txn, &record, &title, &artist_name, options.policy).await;
                settle(txn, result).await
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(outcome) => summary.record(outcome),
            Err(err) => {
                warn!("Line {}: {}", record.line, err);
                summary.errors.push(format!("{} - {}: {}", title, artist_name, err));
                summary.skipped += 1;
            }
        }
    }
    summary.total = album::Entity::find().count(connection).await?;
    Ok(summary)
}

/// The album fields a row carries, cut to the column limits.
pub fn album_fields(record: &Record, title: &str) -> (AlbumModel, Vec<String>) {
    let styles: Vec<String> = record
        .text(STYLES)
        .map(|text| parse_styles(&text))
        .unwrap_or_default();
    let fields = AlbumModel {
        title: truncate(title, album::TITLE_MAX),
        label: limited(record.get(LABEL), album::LABEL_MAX),
        catalog_number: limited(record.get(CATALOG_NUMBER), album::CATALOG_NUMBER_MAX),
        genre: styles.first().map(|s| truncate(s, album::GENRE_MAX)),
        format: limited(record.get(FORMAT), album::FORMAT_MAX),
        release_date: parse_date(record.get(RELEASE_DATE)),
        storage: limited(record.get(STORAGE), album::STORAGE_MAX),
        notes: record.text(NOTES),
        cost: parse_float(record.get(COST)),
        closed: parse_bool(record.get(CLOSED)),
    };
    let styles = styles
        .iter()
        .map(|s| truncate(s, style::NAME_MAX))
        .collect();
    (fields, styles)
}

async fn album_row<C: ConnectionTrait>(
    db: &C,
    record: &Record<'_>,
    title: &str,
    artist_name: &str,
    policy: ConflictPolicy,
) -> Result<RowOutcome, DbErr> {
    let artist_name = truncate(artist_name, artist::NAME_MAX);
    let artist = match queries::get_artist_by_name(db, &artist_name).await? {
        Some(artist) => artist,
        None => {
            artist::ActiveModel {
                name: ActiveValue::Set(artist_name.clone()),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    let (fields, styles) = album_fields(record, title);
    let existing = queries::find_album(db, &fields.title, artist.id).await?;
    if existing.is_some() && policy == ConflictPolicy::Skip {
        return Ok(RowOutcome::Skipped);
    }

    let mut active = fields.into_active_model();
    active.artist_id = ActiveValue::Set(artist.id);
    let (album, outcome) = match existing {
        Some(existing) => {
            active.id = ActiveValue::Unchanged(existing.id);
            (active.update(db).await?, RowOutcome::Updated)
        }
        None => (active.insert(db).await?, RowOutcome::Created),
    };
    if !styles.is_empty() {
        queries::set_album_styles(db, album.id, &styles).await?;
    }
    Ok(outcome)
}
