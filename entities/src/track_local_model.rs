use crate::track::ActiveModel;
use sea_orm::DeriveIntoActiveModel;

#[derive(DeriveIntoActiveModel, PartialEq, Eq, Clone, Debug, Default)]
pub struct TrackModel {
    pub title: String,
    pub section: Option<String>,
    pub ordinal: Option<String>,
    pub credits: Option<String>,
    pub duration: Option<String>,
}
