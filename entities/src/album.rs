use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "album")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub label: Option<String>,
    pub catalog_number: Option<String>,
    pub genre: Option<String>,
    pub format: Option<String>,
    pub release_date: Option<Date>,
    pub storage: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub cover: Option<String>,
    pub artist_id: i32,
    pub cost: f64,
    pub closed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::artist::Entity",
        from = "Column::ArtistId",
        to = "super::artist::Column::Id",
        on_delete = "Cascade"
    )]
    Artist,
    #[sea_orm(has_many = "super::track::Entity")]
    Track,
    #[sea_orm(has_many = "super::album_style::Entity")]
    AlbumStyle,
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl Related<super::track::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Track.def()
    }
}

impl Related<super::style::Entity> for Entity {
    fn to() -> RelationDef {
        super::album_style::Relation::Style.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::album_style::Relation::Album.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Genres containing this word are listed after everything else in reports.
pub const CLASSICAL_GENRE: &str = "classica";

impl Model {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|date| chrono::Datelike::year(&date))
    }

    pub fn is_classical(&self) -> bool {
        self.genre
            .as_deref()
            .map(|genre| genre.to_lowercase().contains(CLASSICAL_GENRE))
            .unwrap_or(false)
    }
}

pub const TITLE_MAX: usize = 140;
pub const LABEL_MAX: usize = 40;
pub const CATALOG_NUMBER_MAX: usize = 30;
pub const GENRE_MAX: usize = 30;
pub const FORMAT_MAX: usize = 20;
pub const STORAGE_MAX: usize = 10;
