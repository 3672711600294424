use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::auth_middleware::Viewer;

pub mod forms;
pub mod pages;
pub mod search_response;

/// Escapes text for use inside HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn escape_opt(text: Option<&str>) -> String {
    text.map(escape).unwrap_or_default()
}

/// 302 to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub fn page(title: &str, viewer: &Viewer, messages: &[String], body: &str) -> Html<String> {
    let account = match &viewer.user {
        Some(user) => format!(
            r#"<a href="/user/{name}">{name}</a>
      <form method="post" action="/logout" class="inline"><button type="submit">Log out</button></form>"#,
            name = escape(&user.username)
        ),
        None => r#"<a href="/login">Log in</a> <a href="/register">Sign up</a>"#.to_string(),
    };
    let staff_links = if viewer.is_staff() {
        r#"<a href="/artist/new">New artist</a>"#
    } else {
        ""
    };
    let flashes: String = messages
        .iter()
        .map(|m| format!(r#"<div class="alert">{}</div>"#, escape(m)))
        .collect();
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title} | recordshelf</title>
  <style>
    body {{ font-family: sans-serif; margin: 0 auto; max-width: 960px; padding: 0 16px; }}
    nav {{ display: flex; gap: 12px; align-items: center; padding: 12px 0; border-bottom: 1px solid #ddd; }}
    .alert {{ background: #e8f4e8; padding: 8px; margin: 8px 0; }}
    .errors {{ color: #a00; }}
    .inline {{ display: inline; }}
    .badge {{ background: #444; color: #fff; border-radius: 8px; padding: 0 6px; }}
    table {{ border-collapse: collapse; width: 100%; }}
    td, th {{ border-bottom: 1px solid #eee; padding: 4px; text-align: left; }}
  </style>
</head>
<body>
  <nav>
    <a href="/">Home</a>
    <a href="/artists">Artists</a>
    <a href="/albums">Albums</a>
    <a href="/users">Users</a>
    <a href="/report/artists.pdf">PDF report</a>
    {staff_links}
    <form method="get" action="/search" class="inline"><input type="search" name="q" placeholder="Search"></form>
    <span>{account}</span>
  </nav>
  {flashes}
  <h1>{title}</h1>
  {body}
</body>
</html>"#,
        title = escape(title),
    ))
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Error");
    page(title, &Viewer::default(), &[], &format!("<p>{}</p>", escape(message)))
}
