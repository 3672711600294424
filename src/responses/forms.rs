//! Staff edit forms, delete confirmations and account forms.

use axum::response::Html;

use super::{escape, page};
use crate::auth_middleware::Viewer;
use crate::forms::{AlbumForm, ArtistForm, RegisterForm, TrackForm};

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!(r#"<ul class="errors">{}</ul>"#, items)
}

fn text_input(name: &str, label: &str, value: &str, kind: &str) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label><br><input type="{kind}" id="{name}" name="{name}" value="{value}"></p>"#,
        value = escape(value)
    )
}

fn text_area(name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label><br><textarea id="{name}" name="{name}" rows="4" cols="60">{value}</textarea></p>"#,
        value = escape(value)
    )
}

fn form_page(
    title: &str,
    viewer: &Viewer,
    action: &str,
    cancel: &str,
    errors: &[String],
    fields: &str,
) -> Html<String> {
    let body = format!(
        r#"{errors}<form method="post" action="{action}">{fields}<button type="submit">Save</button> <a href="{cancel}">Cancel</a></form>"#,
        errors = error_list(errors),
        action = escape(action),
        cancel = escape(cancel),
    );
    page(title, viewer, &[], &body)
}

pub fn artist_form(
    title: &str,
    viewer: &Viewer,
    action: &str,
    cancel: &str,
    form: &ArtistForm,
    errors: &[String],
) -> Html<String> {
    let fields = [
        text_input("name", "Name", &form.name, "text"),
        text_area("profile", "Profile", &form.profile),
        text_input("members", "Members", &form.members, "text"),
        text_input("sites", "Links", &form.sites, "text"),
    ]
    .concat();
    form_page(title, viewer, action, cancel, errors, &fields)
}

pub fn album_form(
    title: &str,
    viewer: &Viewer,
    action: &str,
    cancel: &str,
    form: &AlbumForm,
    errors: &[String],
) -> Html<String> {
    let closed = format!(
        r#"<p><label><input type="checkbox" name="closed"{}> Closed</label></p>"#,
        if form.closed.is_some() { " checked" } else { "" }
    );
    let fields = [
        text_input("title", "Title", &form.title, "text"),
        text_input("label", "Label", &form.label, "text"),
        text_input("catalog_number", "Catalog number", &form.catalog_number, "text"),
        text_input("genre", "Genre", &form.genre, "text"),
        text_input("styles", "Styles (comma separated)", &form.styles, "text"),
        text_input("format", "Format", &form.format, "text"),
        text_input("storage", "Storage", &form.storage, "text"),
        text_input("release_date", "Release date", &form.release_date, "text"),
        text_input("cost", "Cost", &form.cost, "text"),
        closed,
        text_area("notes", "Notes", &form.notes),
    ]
    .concat();
    form_page(title, viewer, action, cancel, errors, &fields)
}

pub fn track_form(
    title: &str,
    viewer: &Viewer,
    action: &str,
    cancel: &str,
    form: &TrackForm,
    errors: &[String],
) -> Html<String> {
    let fields = [
        text_input("title", "Title", &form.title, "text"),
        text_input("section", "Side", &form.section, "text"),
        text_input("ordinal", "Position", &form.ordinal, "text"),
        text_input("duration", "Duration", &form.duration, "text"),
        text_input("credits", "Credits", &form.credits, "text"),
    ]
    .concat();
    form_page(title, viewer, action, cancel, errors, &fields)
}

pub fn confirm_delete(
    title: &str,
    viewer: &Viewer,
    question: &str,
    action: &str,
    cancel: &str,
) -> Html<String> {
    let body = format!(
        r#"<p>{question}</p><form method="post" action="{action}"><button type="submit">Delete</button> <a href="{cancel}">Cancel</a></form>"#,
        question = escape(question),
        action = escape(action),
        cancel = escape(cancel),
    );
    page(title, viewer, &[], &body)
}

pub fn register(viewer: &Viewer, form: &RegisterForm, errors: &[String]) -> Html<String> {
    let fields = [
        text_input("username", "Username", &form.username, "text"),
        text_input("email", "Email", &form.email, "email"),
        text_input("password1", "Password", "", "password"),
        text_input("password2", "Password confirmation", "", "password"),
    ]
    .concat();
    let body = format!(
        r#"{}<form method="post" action="/register">{}<button type="submit">Sign up</button></form>"#,
        error_list(errors),
        fields
    );
    page("Sign up", viewer, &[], &body)
}

pub fn login(viewer: &Viewer, username: &str, next: &str, errors: &[String]) -> Html<String> {
    let body = format!(
        r#"{errors}<form method="post" action="/login">{user}{password}<input type="hidden" name="next" value="{next}"><button type="submit">Log in</button></form><p>No account? <a href="/register">Sign up</a></p>"#,
        errors = error_list(errors),
        user = text_input("username", "Username", username, "text"),
        password = text_input("password", "Password", "", "password"),
        next = escape(next),
    );
    page("Log in", viewer, &[], &body)
}
