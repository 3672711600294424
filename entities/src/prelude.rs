pub use super::album::Entity as Album;
pub use super::album_style::Entity as AlbumStyle;
pub use super::artist::Entity as Artist;
pub use super::session::Entity as Session;
pub use super::style::Entity as Style;
pub use super::track::Entity as Track;
pub use super::user::Entity as User;
