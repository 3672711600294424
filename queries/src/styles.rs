use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder,
};

use entities::{album, album_style, style};

pub async fn get_or_create_style<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<style::Model, DbErr> {
    if let Some(existing) = style::Entity::find()
        .filter(style::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }
    style::ActiveModel {
        name: ActiveValue::Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Replaces the album's style tags with `names`, creating missing styles.
pub async fn set_album_styles<C: ConnectionTrait>(
    db: &C,
    album_id: i32,
    names: &[String],
) -> Result<Vec<style::Model>, DbErr> {
    album_style::Entity::delete_many()
        .filter(album_style::Column::AlbumId.eq(album_id))
        .exec(db)
        .await?;
    let mut styles: Vec<style::Model> = Vec::new();
    for name in names {
        let style = get_or_create_style(db, name).await?;
        if styles.iter().any(|s| s.id == style.id) {
            continue;
        }
        album_style::ActiveModel {
            album_id: ActiveValue::Set(album_id),
            style_id: ActiveValue::Set(style.id),
        }
        .insert(db)
        .await?;
        styles.push(style);
    }
    Ok(styles)
}

pub async fn album_styles<C: ConnectionTrait>(
    db: &C,
    album: &album::Model,
) -> Result<Vec<style::Model>, DbErr> {
    album
        .find_related(style::Entity)
        .order_by_asc(style::Column::Name)
        .all(db)
        .await
}
