use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, IdenStatic, QueryFilter,
    QueryOrder,
};

use entities::{album, artist, track};

/// Three independent match sets for one query.
#[derive(Debug, Default, Clone)]
pub struct SearchResults {
    pub query: String,
    pub artists: Vec<artist::Model>,
    pub albums: Vec<(album::Model, Option<artist::Model>)>,
    pub tracks: Vec<(track::Model, Option<album::Model>)>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.albums.is_empty() && self.tracks.is_empty()
    }
}

pub async fn search<C: ConnectionTrait>(db: &C, query: &str) -> Result<SearchResults, DbErr> {
    let needle = query.trim();
    if needle.is_empty() {
        return Ok(SearchResults {
            query: query.to_string(),
            ..Default::default()
        });
    }

    let artists = artist::Entity::find()
        .filter(
            Condition::any()
                .add(icontains(artist::Entity, artist::Column::Name, needle))
                .add(icontains(artist::Entity, artist::Column::Profile, needle))
                .add(icontains(artist::Entity, artist::Column::Members, needle)),
        )
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?;

    let albums = album::Entity::find()
        .find_also_related(artist::Entity)
        .filter(
            Condition::any()
                .add(icontains(album::Entity, album::Column::Title, needle))
                .add(icontains(album::Entity, album::Column::Label, needle))
                .add(icontains(album::Entity, album::Column::Genre, needle))
                .add(icontains(album::Entity, album::Column::Notes, needle))
                .add(icontains(artist::Entity, artist::Column::Name, needle)),
        )
        .order_by_asc(album::Column::Title)
        .all(db)
        .await?;

    let tracks = track::Entity::find()
        .find_also_related(album::Entity)
        .filter(
            Condition::any()
                .add(icontains(track::Entity, track::Column::Title, needle))
                .add(icontains(track::Entity, track::Column::Credits, needle)),
        )
        .order_by_asc(track::Column::Title)
        .all(db)
        .await?;

    Ok(SearchResults {
        query: query.to_string(),
        artists,
        albums,
        tracks,
    })
}

/// `lower(table.column) LIKE '%needle%'` with the needle's wildcards escaped,
/// so it behaves the same on Postgres and SQLite.
fn icontains<E, C>(entity: E, column: C, needle: &str) -> SimpleExpr
where
    E: IdenStatic,
    C: ColumnTrait,
{
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((entity, column)))).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
