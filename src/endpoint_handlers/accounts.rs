use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use log::{info, warn};

use entities::user_local_model::UserModel;

use super::NextQuery;
use crate::auth_middleware::{expired_session_cookie, safe_next, session_cookie, Viewer};
use crate::error::AppError;
use crate::forms::{LoginForm, RegisterForm};
use crate::passwords::{hash_password, new_session_token, verify_password};
use crate::responses::{forms, found, pages};
use crate::AppState;

const BAD_LOGIN: &str = "Please enter a correct username and password.";

/// Opens a session for `user_id` and redirects to `location` with the cookie set.
async fn sign_in(state: &AppState, user_id: i32, location: &str) -> Result<Response, AppError> {
    let token = new_session_token();
    queries::create_session(
        &state.connection,
        user_id,
        &token,
        chrono::Utc::now().naive_utc(),
    )
    .await?;
    let mut response = found(location);
    response
        .headers_mut()
        .insert(header::SET_COOKIE, session_cookie(&token));
    Ok(response)
}

pub async fn register_page(viewer: Viewer) -> Html<String> {
    forms::register(&viewer, &RegisterForm::default(), &[])
}

pub async fn register(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let mut errors = form.validate();
    let username = form.username.trim();
    if !username.is_empty()
        && queries::get_user_by_username(&state.connection, username)
            .await?
            .is_some()
    {
        errors.push("A user with that username already exists.".to_string());
    }
    if !errors.is_empty() {
        return Ok(forms::register(&viewer, &form, &errors).into_response());
    }
    let user = queries::add_user(
        &state.connection,
        UserModel {
            username: username.to_string(),
            email: form.email.trim().to_string(),
            password: hash_password(&form.password1)?,
            is_staff: false,
            is_superuser: false,
            date_joined: chrono::Utc::now().naive_utc(),
        },
    )
    .await?;
    info!("Registered user {}", user.username);
    sign_in(&state, user.id, "/").await
}

pub async fn login_page(viewer: Viewer, Query(query): Query<NextQuery>) -> Html<String> {
    forms::login(&viewer, "", safe_next(query.next.as_deref()), &[])
}

pub async fn login(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = safe_next(form.next.as_deref());
    let user = queries::get_user_by_username(&state.connection, form.username.trim()).await?;
    match user {
        Some(user) if verify_password(&form.password, &user.password) => {
            info!("User {} logged in", user.username);
            sign_in(&state, user.id, next).await
        }
        _ => {
            warn!("Failed login for {}", form.username);
            Ok(forms::login(&viewer, &form.username, next, &[BAD_LOGIN.to_string()])
                .into_response())
        }
    }
}

pub async fn logout(State(state): State<AppState>, viewer: Viewer) -> Result<Response, AppError> {
    if let Some(token) = viewer.session() {
        queries::delete_session(&state.connection, token).await?;
    }
    state.flashes.clear(viewer.session());
    let mut response = found("/");
    response
        .headers_mut()
        .insert(header::SET_COOKIE, expired_session_cookie());
    Ok(response)
}

pub async fn users(State(state): State<AppState>, viewer: Viewer) -> Result<Html<String>, AppError> {
    let users = queries::list_users(&state.connection).await?;
    let messages = state.flashes.take(viewer.session());
    Ok(pages::users(&viewer, &messages, &users))
}

pub async fn profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(username): Path<String>,
) -> Result<Html<String>, AppError> {
    let user = queries::get_user_by_username(&state.connection, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user named {}", username)))?;
    let messages = state.flashes.take(viewer.session());
    Ok(pages::profile(&viewer, &messages, &user))
}
