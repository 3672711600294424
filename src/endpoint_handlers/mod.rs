//! Axum handlers, grouped by the pages they serve.

use serde::Deserialize;

pub mod accounts;
pub mod catalog;
pub mod edit;
pub mod report;
pub mod search;

/// `?next=` on the login page.
#[derive(Deserialize, Default)]
pub struct NextQuery {
    #[serde(default)]
    pub next: Option<String>,
}
