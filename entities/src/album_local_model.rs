use crate::album::ActiveModel;
use sea_orm::prelude::Date;
use sea_orm::DeriveIntoActiveModel;

/// Album fields coming from outside the database (import rows, forms).
/// Converting leaves `id` and `artist_id` unset.
#[derive(DeriveIntoActiveModel, PartialEq, Clone, Debug, Default)]
pub struct AlbumModel {
    pub title: String,
    pub label: Option<String>,
    pub catalog_number: Option<String>,
    pub genre: Option<String>,
    pub format: Option<String>,
    pub release_date: Option<Date>,
    pub storage: Option<String>,
    pub notes: Option<String>,
    pub cost: f64,
    pub closed: bool,
}
