use axum::response::Html;

use entities::{album, artist, user};
use queries::{AlbumDetail, ArtistSummary, SearchResults};

use super::{escape, escape_opt, page};
use crate::auth_middleware::Viewer;

fn media_url(path: &str) -> String {
    format!("/media/{}", escape(path))
}

fn year(album: &album::Model) -> String {
    album
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn artist_rows(artists: &[ArtistSummary]) -> String {
    if artists.is_empty() {
        return "<p>No artists yet.</p>".to_string();
    }
    let rows: String = artists
        .iter()
        .map(|summary| {
            format!(
                r#"<tr><td><a href="/artist/{id}">{name}</a></td><td>{albums}</td><td>{closed}</td></tr>"#,
                id = summary.artist.id,
                name = escape(&summary.artist.name),
                albums = summary.album_count,
                closed = summary.closed_count,
            )
        })
        .collect();
    format!(
        "<table><tr><th>Artist</th><th>Albums</th><th>Closed</th></tr>{}</table>",
        rows
    )
}

pub fn home(viewer: &Viewer, messages: &[String], artists: &[ArtistSummary]) -> Html<String> {
    let body = format!(
        r#"<p>{count} artists in the catalog. <a href="/albums">Browse albums</a>.</p>{rows}"#,
        count = artists.len(),
        rows = artist_rows(artists)
    );
    page("Music catalog", viewer, messages, &body)
}

pub fn artists(viewer: &Viewer, messages: &[String], artists: &[ArtistSummary]) -> Html<String> {
    page("Artists", viewer, messages, &artist_rows(artists))
}

pub fn albums(
    viewer: &Viewer,
    messages: &[String],
    albums: &[(album::Model, Option<artist::Model>)],
) -> Html<String> {
    if albums.is_empty() {
        return page("Albums", viewer, messages, "<p>No albums yet.</p>");
    }
    let rows: String = albums
        .iter()
        .map(|(album, artist)| {
            let artist = match artist {
                Some(artist) => format!(
                    r#"<a href="/artist/{}">{}</a>"#,
                    artist.id,
                    escape(&artist.name)
                ),
                None => String::new(),
            };
            format!(
                r#"<tr><td><a href="/album/{id}">{title}</a>{closed}</td><td>{artist}</td><td>{year}</td><td>{genre}</td></tr>"#,
                id = album.id,
                title = escape(&album.title),
                closed = if album.closed { r#" <span class="badge">closed</span>"# } else { "" },
                year = year(album),
                genre = escape_opt(album.genre.as_deref()),
            )
        })
        .collect();
    let body = format!(
        "<table><tr><th>Title</th><th>Artist</th><th>Year</th><th>Genre</th></tr>{}</table>",
        rows
    );
    page("Albums", viewer, messages, &body)
}

pub fn artist(
    viewer: &Viewer,
    messages: &[String],
    artist: &artist::Model,
    albums: &[album::Model],
) -> Html<String> {
    let mut body = String::new();
    if let Some(photo) = artist.photo.as_deref().filter(|p| !p.is_empty()) {
        body.push_str(&format!(
            r#"<img src="{}" alt="{}" width="240">"#,
            media_url(photo),
            escape(&artist.name)
        ));
    }
    if let Some(profile) = &artist.profile {
        body.push_str(&format!("<p>{}</p>", escape(profile)));
    }
    if let Some(members) = &artist.members {
        body.push_str(&format!("<p><strong>Members:</strong> {}</p>", escape(members)));
    }
    if let Some(sites) = &artist.sites {
        body.push_str(&format!("<p><strong>Links:</strong> {}</p>", escape(sites)));
    }
    if viewer.is_staff() {
        body.push_str(&format!(
            r#"<p><a href="/artist/{id}/edit">Edit</a> <a href="/artist/{id}/delete">Delete</a> <a href="/artist/{id}/album/new">Add album</a></p>"#,
            id = artist.id
        ));
    }
    body.push_str(&format!("<h2>Discography ({})</h2>", albums.len()));
    if albums.is_empty() {
        body.push_str("<p>No albums.</p>");
    } else {
        body.push_str("<ul>");
        for album in albums {
            body.push_str(&format!(
                r#"<li><a href="/album/{}">{}</a> ({})</li>"#,
                album.id,
                escape(&album.title),
                year(album)
            ));
        }
        body.push_str("</ul>");
    }
    page(&artist.name, viewer, messages, &body)
}

pub fn album(viewer: &Viewer, messages: &[String], detail: &AlbumDetail) -> Html<String> {
    let album = &detail.album;
    let mut body = String::new();
    if let Some(cover) = album.cover.as_deref().filter(|c| !c.is_empty()) {
        body.push_str(&format!(
            r#"<img src="{}" alt="{}" width="240">"#,
            media_url(cover),
            escape(&album.title)
        ));
    }
    body.push_str(&format!(
        r#"<p>by <a href="/artist/{}">{}</a></p><table>"#,
        detail.artist.id,
        escape(&detail.artist.name)
    ));
    let styles = detail
        .styles
        .iter()
        .map(|s| escape(&s.name))
        .collect::<Vec<_>>()
        .join(", ");
    let release = album
        .release_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    for (label, value) in [
        ("Label", escape_opt(album.label.as_deref())),
        ("Catalog number", escape_opt(album.catalog_number.as_deref())),
        ("Genre", escape_opt(album.genre.as_deref())),
        ("Styles", styles),
        ("Format", escape_opt(album.format.as_deref())),
        ("Storage", escape_opt(album.storage.as_deref())),
        ("Release date", release),
        ("Cost", format!("{:.2}", album.cost)),
        ("Closed", if album.closed { "yes" } else { "no" }.to_string()),
    ] {
        body.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>", label, value));
    }
    body.push_str("</table>");
    if let Some(notes) = &album.notes {
        body.push_str(&format!("<p>{}</p>", escape(notes)));
    }
    let staff = viewer.is_staff();
    if staff {
        body.push_str(&format!(
            r#"<p><a href="/album/{id}/edit">Edit</a> <a href="/album/{id}/delete">Delete</a> <a href="/album/{id}/track/new">Add track</a></p>"#,
            id = album.id
        ));
    }
    body.push_str(&format!("<h2>Tracks ({})</h2>", detail.tracks.len()));
    if detail.tracks.is_empty() {
        body.push_str("<p>No tracks available</p>");
    } else {
        body.push_str("<table>");
        for track in &detail.tracks {
            let actions = if staff {
                format!(
                    r#"<td><a href="/track/{id}/edit">Edit</a> <a href="/track/{id}/delete">Delete</a></td>"#,
                    id = track.id
                )
            } else {
                String::new()
            };
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>{}</tr>",
                escape_opt(track.section.as_deref()),
                escape_opt(track.ordinal.as_deref()),
                escape(&track.title),
                escape_opt(track.duration.as_deref()),
                escape_opt(track.credits.as_deref()),
                actions
            ));
        }
        body.push_str("</table>");
    }
    page(&album.title, viewer, messages, &body)
}

pub fn search(viewer: &Viewer, messages: &[String], results: &SearchResults) -> Html<String> {
    let mut body = format!(
        r#"<form method="get" action="/search"><input type="search" name="q" value="{}"> <button type="submit">Search</button></form>"#,
        escape(&results.query)
    );
    if results.query.trim().is_empty() {
        return page("Search", viewer, messages, &body);
    }
    body.push_str(&format!("<h2>Artists ({})</h2><ul>", results.artists.len()));
    for artist in &results.artists {
        body.push_str(&format!(
            r#"<li><a href="/artist/{}">{}</a></li>"#,
            artist.id,
            escape(&artist.name)
        ));
    }
    body.push_str(&format!("</ul><h2>Albums ({})</h2><ul>", results.albums.len()));
    for (album, artist) in &results.albums {
        body.push_str(&format!(
            r#"<li><a href="/album/{}">{}</a> {}</li>"#,
            album.id,
            escape(&album.title),
            artist
                .as_ref()
                .map(|a| format!("by {}", escape(&a.name)))
                .unwrap_or_default()
        ));
    }
    body.push_str(&format!("</ul><h2>Tracks ({})</h2><ul>", results.tracks.len()));
    for (track, album) in &results.tracks {
        let album = match album {
            Some(album) => format!(
                r#" on <a href="/album/{}">{}</a>"#,
                album.id,
                escape(&album.title)
            ),
            None => String::new(),
        };
        body.push_str(&format!("<li>{}{}</li>", escape(&track.title), album));
    }
    body.push_str("</ul>");
    if results.is_empty() {
        body.push_str("<p>Nothing matches your search.</p>");
    }
    page(&format!("Search: {}", results.query), viewer, messages, &body)
}

pub fn users(viewer: &Viewer, messages: &[String], users: &[user::Model]) -> Html<String> {
    let items: String = users
        .iter()
        .map(|user| {
            format!(
                r#"<li><a href="/user/{name}">{name}</a>{staff}</li>"#,
                name = escape(&user.username),
                staff = if user.is_staff { r#" <span class="badge">staff</span>"# } else { "" }
            )
        })
        .collect();
    page("Users", viewer, messages, &format!("<ul>{}</ul>", items))
}

pub fn profile(viewer: &Viewer, messages: &[String], user: &user::Model) -> Html<String> {
    let mut body = format!(
        "<p>Member since {}</p>",
        user.date_joined.format("%Y-%m-%d")
    );
    if !user.email.is_empty() {
        body.push_str(&format!("<p>Email: {}</p>", escape(&user.email)));
    }
    if user.is_staff {
        body.push_str("<p>Staff member</p>");
    }
    page(&user.username, viewer, messages, &body)
}
