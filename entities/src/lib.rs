pub mod prelude;

pub mod album;
pub mod album_local_model;
pub mod album_style;
pub mod artist;
pub mod session;
pub mod style;
pub mod track;
pub mod track_local_model;
pub mod user;
pub mod user_local_model;
