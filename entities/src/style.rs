use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "style")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::album_style::Entity")]
    AlbumStyle,
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        super::album_style::Relation::Album.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::album_style::Relation::Style.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const NAME_MAX: usize = 20;
