//! Spreadsheet import behaviour, fed with in-memory sheets.

mod common;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use common::*;
use entities::{album, artist, track};
use recordshelf::import::{
    import_albums, import_artists, import_tracks, Cell, ConflictPolicy, ImportOptions, Sheet,
};

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

const ALBUM_HEADERS: [&str; 11] = [
    "titolo_album",
    "artista_appartenenza",
    "editore",
    "catalogo",
    "supporto",
    "deposito",
    "note",
    "costo",
    "closed",
    "data_rilascio",
    "stili",
];

fn album_row(title: &str, artist: &str, label: &str, styles: &str) -> Vec<Cell> {
    vec![
        text(title),
        text(artist),
        text(label),
        Cell::Number(7243.0),
        text("LP"),
        text("A1"),
        Cell::Empty,
        Cell::Number(19.9),
        text("sì"),
        Cell::Number(1969.0),
        text(styles),
    ]
}

fn options(policy: ConflictPolicy) -> ImportOptions {
    ImportOptions {
        policy,
        ..Default::default()
    }
}

#[tokio::test]
async fn album_import_skips_or_updates_existing() {
    let db = connect().await;
    let first = Sheet::from_rows(
        &ALBUM_HEADERS,
        vec![album_row("Abbey Road", "The Beatles", "Apple", "Rock / Pop")],
    );
    let summary = import_albums(&first, &options(ConflictPolicy::Skip), &db).await.unwrap();
    assert_eq!((summary.created, summary.skipped), (1, 0));

    let again = Sheet::from_rows(
        &ALBUM_HEADERS,
        vec![album_row("Abbey Road", "The Beatles", "EMI", "Rock")],
    );
    let summary = import_albums(&again, &options(ConflictPolicy::Skip), &db).await.unwrap();
    assert_eq!((summary.created, summary.skipped), (0, 1));
    assert_eq!(album::Entity::find().count(&db).await.unwrap(), 1);
    let stored = album::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(stored.label.as_deref(), Some("Apple"));

    let summary = import_albums(&again, &options(ConflictPolicy::Update), &db).await.unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(album::Entity::find().count(&db).await.unwrap(), 1);
    let stored = album::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(stored.label.as_deref(), Some("EMI"));
    assert_eq!(stored.genre.as_deref(), Some("Rock"));
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn album_rows_are_parsed_and_truncated() {
    let db = connect().await;
    let long_storage = "Shelf twelve, top row";
    let mut row = album_row("Let It Be", "The Beatles", "Apple", "Rock, Pop; Soul");
    row[5] = text(long_storage);
    let sheet = Sheet::from_rows(&ALBUM_HEADERS, vec![row]);
    import_albums(&sheet, &options(ConflictPolicy::Skip), &db).await.unwrap();

    let stored = album::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(stored.catalog_number.as_deref(), Some("7243"));
    assert_eq!(stored.storage.as_deref(), Some("Shelf twel"));
    assert_eq!(stored.release_date, NaiveDate::from_ymd_opt(1969, 1, 1));
    assert_eq!(stored.cost, 19.9);
    assert!(stored.closed);
    assert_eq!(stored.genre.as_deref(), Some("Rock"));
    let styles = queries::album_styles(&db, &stored).await.unwrap();
    let names: Vec<_> = styles.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Pop; Soul", "Rock"]);
}

#[tokio::test]
async fn rows_without_title_or_artist_are_skipped() {
    let db = connect().await;
    let sheet = Sheet::from_rows(
        &ALBUM_HEADERS,
        vec![
            album_row("", "The Beatles", "Apple", "Rock"),
            album_row("Help!", "", "Apple", "Rock"),
        ],
    );
    let summary = import_albums(&sheet, &options(ConflictPolicy::Skip), &db).await.unwrap();
    assert_eq!((summary.created, summary.skipped), (0, 2));
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn dry_run_and_limit_write_nothing() {
    let db = connect().await;
    let rows = (1..=8)
        .map(|n| album_row(&format!("Album {n}"), "Various", "", ""))
        .collect();
    let sheet = Sheet::from_rows(&ALBUM_HEADERS, rows);
    let summary = import_albums(
        &sheet,
        &ImportOptions {
            limit: Some(6),
            dry_run: true,
            policy: ConflictPolicy::Skip,
        },
        &db,
    )
    .await
    .unwrap();
    assert_eq!(summary.rows, 6);
    assert_eq!(summary.preview.len(), 5);
    assert_eq!(summary.preview[0], "Album 1 - Various");
    assert_eq!(album::Entity::find().count(&db).await.unwrap(), 0);

    let summary = import_albums(
        &sheet,
        &ImportOptions {
            limit: Some(3),
            ..Default::default()
        },
        &db,
    )
    .await
    .unwrap();
    assert_eq!(summary.created, 3);
    assert_eq!(summary.total, 3);
}

#[tokio::test]
async fn artist_import_reads_the_first_column() {
    let db = connect().await;
    seed_artist(&db, "Queen").await;
    let sheet = Sheet::from_rows(
        &["Artista"],
        vec![
            vec![text("Queen")],
            vec![text(" David Bowie ")],
            vec![Cell::Empty],
            vec![text("None")],
        ],
    );
    let summary = import_artists(&sheet, &options(ConflictPolicy::Skip), &db).await.unwrap();
    assert_eq!((summary.created, summary.skipped), (1, 1));

    let summary = import_artists(&sheet, &options(ConflictPolicy::Update), &db).await.unwrap();
    assert_eq!((summary.created, summary.updated), (0, 2));
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 2);
    assert!(queries::get_artist_by_name(&db, "David Bowie").await.unwrap().is_some());
}

const TRACK_HEADERS: [&str; 4] = ["TitoloAlbum", "Artista", "ArtistaCompilation", "Tracce"];

fn track_row(album: &str, artist: &str, compilation: &str, title: &str) -> Vec<Cell> {
    vec![text(album), text(artist), text(compilation), text(title)]
}

#[tokio::test]
async fn track_ordinals_continue_from_existing_tracks() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    let wall = seed_album(&db, floyd.id, "The Wall").await;
    seed_tracks(&db, wall.id, 2).await;

    let sheet = Sheet::from_rows(
        &TRACK_HEADERS,
        vec![
            track_row("The Wall", "Pink Floyd", "", "Mother"),
            track_row("The Wall", "Pink Floyd", "", "Goodbye Blue Sky"),
            track_row("The Wall", "Pink Floyd", "", "Mother"),
        ],
    );
    let summary = import_tracks(&sheet, &options(ConflictPolicy::Skip), &db).await.unwrap();
    assert_eq!((summary.created, summary.skipped), (2, 1));

    let ordinals: Vec<_> = track::Entity::find()
        .filter(track::Column::AlbumId.eq(wall.id))
        .order_by_asc(track::Column::Id)
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.ordinal.unwrap_or_default())
        .collect();
    assert_eq!(ordinals, vec!["001", "002", "003", "004"]);
}

#[tokio::test]
async fn track_albums_are_narrowed_by_artist() {
    let db = connect().await;
    let queen = seed_artist(&db, "Queen").await;
    let abba = seed_artist(&db, "ABBA").await;
    let various = seed_artist(&db, "Various").await;
    let queen_hits = seed_album(&db, queen.id, "Greatest Hits").await;
    let abba_hits = seed_album(&db, abba.id, "Greatest Hits").await;
    let now = seed_album(&db, various.id, "Now 1").await;

    let sheet = Sheet::from_rows(
        &TRACK_HEADERS,
        vec![
            track_row("Greatest Hits", "ABBA", "", "Waterloo"),
            track_row("Greatest Hits", "Blondie", "Queen", "Bicycle Race"),
            track_row("Now 1", "Somebody", "", "Opener"),
            track_row("Greatest Hits", "Blondie", "", "Atomic"),
            track_row("Missing", "Nobody", "", "Lost"),
        ],
    );
    let summary = import_tracks(&sheet, &options(ConflictPolicy::Skip), &db).await.unwrap();
    assert_eq!(summary.created, 3);
    assert_eq!(summary.missing_album, 2);
    assert_eq!(summary.errors.len(), 2);
    assert!(summary.errors[0].contains("Atomic"));

    for (album_id, title) in [
        (abba_hits.id, "Waterloo"),
        (queen_hits.id, "Bicycle Race"),
        (now.id, "Opener"),
    ] {
        assert!(queries::find_track(&db, title, album_id).await.unwrap().is_some(), "{title}");
    }
}

#[tokio::test]
async fn failing_row_is_rolled_back_and_the_batch_goes_on() {
    let db = connect().await;
    db.execute_unprepared(
        "CREATE TRIGGER reject_bad_album BEFORE INSERT ON album \
         WHEN NEW.title = 'Bad' BEGIN SELECT RAISE(ABORT, 'rejected album'); END",
    )
    .await
    .unwrap();
    let sheet = Sheet::from_rows(
        &ALBUM_HEADERS,
        vec![
            album_row("Abbey Road", "The Beatles", "Apple", "Rock"),
            album_row("Bad", "Nobody Known", "", ""),
            album_row("Help!", "The Beatles", "Parlophone", "Pop"),
        ],
    );

    let summary = import_albums(&sheet, &options(ConflictPolicy::Skip), &db)
        .await
        .unwrap();
    assert_eq!(summary.created, 2);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with("Bad - Nobody Known"));
    assert_eq!(summary.total, 2);

    let artists: Vec<String> = artist::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|artist| artist.name)
        .collect();
    assert_eq!(artists, vec!["The Beatles".to_string()]);
    let titles: Vec<String> = album::Entity::find()
        .order_by_asc(album::Column::Id)
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|album| album.title)
        .collect();
    assert_eq!(titles, vec!["Abbey Road".to_string(), "Help!".to_string()]);
}
