//! HTTP tests driving the full router against an in-memory database.

mod common;

use axum::http::{header, StatusCode};
use axum::Router;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::Value;
use tower::util::ServiceExt;

use common::*;
use entities::{album, artist, track};
use recordshelf::{build_router, AppState};

fn app(db: &DatabaseConnection) -> Router {
    build_router(AppState::new(db.clone(), std::env::temp_dir()))
}

#[tokio::test]
async fn staff_gate_allows_forbids_and_redirects() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    let staff = login_as(&db, "editor", true).await;
    let visitor = login_as(&db, "visitor", false).await;
    let app = app(&db);

    for path in [
        format!("/artist/{}/edit", floyd.id),
        format!("/artist/{}/delete", floyd.id),
    ] {
        let response = app.clone().oneshot(get(&path, Some(staff.as_str()))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");

        let response = app.clone().oneshot(get(&path, Some(visitor.as_str()))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{path}");

        let response = app.clone().oneshot(get(&path, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND, "{path}");
        assert_eq!(location(&response), format!("/login?next={path}"));
    }
}

#[tokio::test]
async fn anonymous_delete_changes_nothing() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    let response = app(&db)
        .oneshot(post_form(&format!("/artist/{}/delete", floyd.id), None, ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_an_album_removes_its_tracks_and_flashes() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    let wall = seed_album(&db, floyd.id, "The Wall").await;
    let animals = seed_album(&db, floyd.id, "Animals").await;
    seed_tracks(&db, wall.id, 3).await;
    seed_tracks(&db, animals.id, 2).await;
    let staff = login_as(&db, "editor", true).await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(post_form(&format!("/album/{}/delete", wall.id), Some(staff.as_str()), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/artist/{}", floyd.id));
    assert_eq!(track::Entity::find().count(&db).await.unwrap(), 2);
    assert!(album::Entity::find_by_id(wall.id).one(&db).await.unwrap().is_none());

    let page = body_text(
        app.clone()
            .oneshot(get(&format!("/artist/{}", floyd.id), Some(staff.as_str())))
            .await
            .unwrap(),
    )
    .await;
    assert!(page.contains("The Wall&quot; and 3 tracks deleted."));
    // Flash messages show once.
    let page = body_text(
        app.oneshot(get(&format!("/artist/{}", floyd.id), Some(staff.as_str())))
            .await
            .unwrap(),
    )
    .await;
    assert!(!page.contains("tracks deleted."));
}

#[tokio::test]
async fn deleting_an_artist_removes_albums_and_tracks() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    let beatles = seed_artist(&db, "The Beatles").await;
    let wall = seed_album(&db, floyd.id, "The Wall").await;
    let abbey = seed_album(&db, beatles.id, "Abbey Road").await;
    seed_tracks(&db, wall.id, 3).await;
    seed_tracks(&db, abbey.id, 4).await;
    let staff = login_as(&db, "editor", true).await;

    let response = app(&db)
        .oneshot(post_form(&format!("/artist/{}/delete", floyd.id), Some(staff.as_str()), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/artists");
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(album::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(track::Entity::find().count(&db).await.unwrap(), 4);
}

#[tokio::test]
async fn staff_can_create_an_album_with_styles() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    let staff = login_as(&db, "editor", true).await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(post_form(
            &format!("/artist/{}/album/new", floyd.id),
            Some(staff.as_str()),
            "title=Meddle&label=Harvest&styles=Prog%2C+Psychedelic&release_date=1971&cost=&closed=on",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    let meddle = album::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(location(&response), format!("/album/{}", meddle.id));
    assert_eq!(meddle.genre.as_deref(), Some("Prog"));
    assert!(meddle.closed);

    let page = body_text(
        app.oneshot(get(&format!("/album/{}", meddle.id), Some(staff.as_str())))
            .await
            .unwrap(),
    )
    .await;
    assert!(page.contains("Prog, Psychedelic"));
    assert!(page.contains("No tracks available"));
    assert!(page.contains(&format!("/album/{}/edit", meddle.id)));
}

#[tokio::test]
async fn invalid_forms_are_shown_again() {
    let db = connect().await;
    let staff = login_as(&db, "editor", true).await;
    let response = app(&db)
        .oneshot(post_form("/artist/new", Some(staff.as_str()), "name=&profile=nobody"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Name is required."));
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn album_page_lists_tracks_and_hides_staff_links() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    let wall = seed_album(&db, floyd.id, "The Wall").await;
    seed_tracks(&db, wall.id, 2).await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(get(&format!("/album/{}", wall.id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Tracks (2)"));
    assert!(!page.contains("/edit"));

    let response = app.oneshot(get("/album/999", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_json_returns_three_sets() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    seed_album(&db, floyd.id, "The Wall").await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(get("/api/search?q=pink%20floyd", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["query"], "pink floyd");
    assert_eq!(body["artists"][0]["name"], "Pink Floyd");
    assert_eq!(body["albums"][0]["title"], "The Wall");
    assert_eq!(body["albums"][0]["artist_name"], "Pink Floyd");

    let response = app.oneshot(get("/api/search", None)).await.unwrap();
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["artists"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["albums"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["tracks"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn search_page_renders_matches() {
    let db = connect().await;
    seed_artist(&db, "The Beatles").await;
    let response = app(&db).oneshot(get("/search?q=beatles", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Artists (1)"));
    assert!(page.contains("The Beatles"));
}

#[tokio::test]
async fn registration_logs_the_new_user_in() {
    let db = connect().await;
    let app = app(&db);
    let response = app
        .clone()
        .oneshot(post_form(
            "/register",
            None,
            "username=ringo&email=ringo%40example.com&password1=octopus-garden&password2=octopus-garden",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("sessionid="));

    let page = body_text(app.clone().oneshot(get("/", Some(cookie.as_str()))).await.unwrap()).await;
    assert!(page.contains("/user/ringo"));

    let response = app
        .oneshot(post_form(
            "/register",
            None,
            "username=ringo&password1=octopus-garden&password2=octopus-garden",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("already exists"));
}

#[tokio::test]
async fn login_follows_local_next_only() {
    let db = connect().await;
    login_as(&db, "george", false).await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(post_form(
            "/login",
            None,
            "username=george&password=wrong&next=%2Falbums",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("correct username and password"));

    let response = app
        .clone()
        .oneshot(post_form(
            "/login",
            None,
            "username=george&password=correct-horse&next=%2Falbums",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/albums");

    let response = app
        .oneshot(post_form(
            "/login",
            None,
            "username=george&password=correct-horse&next=https%3A%2F%2Fevil.example",
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn logout_drops_pending_messages() {
    let db = connect().await;
    let cookie = login_as(&db, "ringo", false).await;
    let token = cookie.split_once('=').map(|(_, token)| token.to_string()).unwrap();
    let state = AppState::new(db.clone(), std::env::temp_dir());
    let flashes = state.flashes.clone();
    flashes.push(Some(token.as_str()), "Album \"Help!\" updated.");

    let response = build_router(state)
        .oneshot(post_form("/logout", Some(cookie.as_str()), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(flashes.take(Some(token.as_str())).is_empty());
}

#[tokio::test]
async fn profiles_exist_only_for_known_users() {
    let db = connect().await;
    login_as(&db, "paul", false).await;
    let app = app(&db);
    let response = app.clone().oneshot(get("/user/paul", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.oneshot(get("/user/yoko", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_is_served_as_pdf() {
    let db = connect().await;
    let floyd = seed_artist(&db, "Pink Floyd").await;
    let wall = seed_album(&db, floyd.id, "The Wall").await;
    seed_tracks(&db, wall.id, 2).await;

    let response = app(&db).oneshot(get("/report/artists.pdf", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"artists_albums.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}
