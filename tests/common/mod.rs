//! Shared helpers for the integration tests: an in-memory database migrated
//! with the real migrator, seed data and request builders.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectOptions, Database, DatabaseConnection};

use entities::user_local_model::UserModel;
use entities::{album, artist, track};
use recordshelf::auth_middleware::SESSION_COOKIE;
use recordshelf::passwords::{hash_password, new_session_token};

pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn seed_artist(db: &DatabaseConnection, name: &str) -> artist::Model {
    artist::ActiveModel {
        name: ActiveValue::Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_album(db: &DatabaseConnection, artist_id: i32, title: &str) -> album::Model {
    album::ActiveModel {
        title: ActiveValue::Set(title.to_string()),
        artist_id: ActiveValue::Set(artist_id),
        release_date: ActiveValue::Set(NaiveDate::from_ymd_opt(1979, 11, 30)),
        cost: ActiveValue::Set(0.0),
        closed: ActiveValue::Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_tracks(db: &DatabaseConnection, album_id: i32, count: usize) {
    for n in 1..=count {
        track::ActiveModel {
            title: ActiveValue::Set(format!("Track {n}")),
            ordinal: ActiveValue::Set(Some(track::padded_ordinal(n))),
            album_id: ActiveValue::Set(album_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }
}

/// Creates a user with password `correct-horse` and an open session.
/// Returns the `Cookie` header value for that session.
pub async fn login_as(db: &DatabaseConnection, username: &str, staff: bool) -> String {
    let user = queries::add_user(
        db,
        UserModel {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: hash_password("correct-horse").unwrap(),
            is_staff: staff,
            is_superuser: false,
            date_joined: chrono::Utc::now().naive_utc(),
        },
    )
    .await
    .unwrap();
    let token = new_session_token();
    queries::create_session(db, user.id, &token, chrono::Utc::now().naive_utc())
        .await
        .unwrap();
    format!("{SESSION_COOKIE}={token}")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
