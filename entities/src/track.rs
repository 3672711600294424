use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "track")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub section: Option<String>,
    /// Zero-padded position inside the album, e.g. `007`.
    pub ordinal: Option<String>,
    pub credits: Option<String>,
    pub duration: Option<String>,
    pub album_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::album::Entity",
        from = "Column::AlbumId",
        to = "super::album::Column::Id",
        on_delete = "Cascade"
    )]
    Album,
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Album.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Width imports pad ordinals to.
pub const ORDINAL_WIDTH: usize = 3;

pub fn padded_ordinal(position: usize) -> String {
    format!("{:0width$}", position, width = ORDINAL_WIDTH)
}

pub const TITLE_MAX: usize = 150;
pub const SECTION_MAX: usize = 2;
pub const CREDITS_MAX: usize = 100;
pub const DURATION_MAX: usize = 5;
