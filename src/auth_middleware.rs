use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

use entities::user;

use crate::error::AppError;
use crate::responses::{error_page, found};
use crate::AppState;

pub const SESSION_COOKIE: &str = "sessionid";
pub const LOGIN_PATH: &str = "/login";

/// Who is making the request: the session token from the cookie and the
/// user it belongs to, if any.
#[derive(Clone, Debug, Default)]
pub struct Viewer {
    pub user: Option<user::Model>,
    pub token: Option<String>,
}

impl Viewer {
    pub fn is_staff(&self) -> bool {
        self.user.as_ref().map(|u| u.is_staff).unwrap_or(false)
    }

    pub fn session(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Outcome of the staff gate.
#[derive(Debug, PartialEq, Eq)]
pub enum Access {
    Allow,
    Forbidden,
    Login { redirect: String },
}

pub fn authorize(principal: Option<&user::Model>, requested_path: &str) -> Access {
    match principal {
        None => Access::Login {
            redirect: format!("{}?next={}", LOGIN_PATH, requested_path),
        },
        Some(user) if user.is_staff => Access::Allow,
        Some(_) => Access::Forbidden,
    }
}

pub async fn require_staff(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let viewer = match load_viewer(&state, request.headers()).await {
        Ok(viewer) => viewer,
        Err(err) => return err.into_response(),
    };
    match authorize(viewer.user.as_ref(), request.uri().path()) {
        Access::Allow => next.run(request).await,
        Access::Forbidden => {
            if let Some(user) = &viewer.user {
                warn!("User {} is not staff: {}", user.username, request.uri().path());
            }
            (
                StatusCode::FORBIDDEN,
                error_page(StatusCode::FORBIDDEN, "Only staff members can do that."),
            )
                .into_response()
        }
        Access::Login { redirect } => found(&redirect),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        load_viewer(state, &parts.headers).await
    }
}

async fn load_viewer(state: &AppState, headers: &HeaderMap) -> Result<Viewer, AppError> {
    let Some(token) = session_token(headers) else {
        return Ok(Viewer::default());
    };
    let user = queries::user_for_session(&state.connection, &token)
        .await
        .map_err(|err| {
            error!("Error in database connection: {}", err);
            AppError::from(err)
        })?;
    if user.is_none() {
        return Ok(Viewer::default());
    }
    Ok(Viewer {
        user,
        token: Some(token),
    })
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("sessionid=; Path=/"))
}

pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("sessionid=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Only local absolute paths are followed after login.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_staff: bool) -> user::Model {
        user::Model {
            id: 1,
            username: "someone".to_string(),
            email: String::new(),
            password: String::new(),
            is_staff,
            is_superuser: false,
            date_joined: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn anonymous_callers_are_sent_to_login() {
        assert_eq!(
            authorize(None, "/artist/3/edit"),
            Access::Login {
                redirect: "/login?next=/artist/3/edit".to_string()
            }
        );
    }

    #[test]
    fn only_staff_is_allowed() {
        assert_eq!(authorize(Some(&user(false)), "/x"), Access::Forbidden);
        assert_eq!(authorize(Some(&user(true)), "/x"), Access::Allow);
    }

    #[test]
    fn session_token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sessionid=abc123"),
        );
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn next_must_be_a_local_path() {
        assert_eq!(safe_next(Some("/album/1")), "/album/1");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
