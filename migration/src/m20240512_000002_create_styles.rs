use sea_orm_migration::prelude::*;

use crate::m20240510_000001_create_catalog::Album;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Style {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum AlbumStyle {
    Table,
    AlbumId,
    StyleId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Style::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Style::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Style::Name).string_len(20).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlbumStyle::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AlbumStyle::AlbumId).integer().not_null())
                    .col(ColumnDef::new(AlbumStyle::StyleId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(AlbumStyle::AlbumId)
                            .col(AlbumStyle::StyleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-album_style-album_id")
                            .from(AlbumStyle::Table, AlbumStyle::AlbumId)
                            .to(Album::Table, Album::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-album_style-style_id")
                            .from(AlbumStyle::Table, AlbumStyle::StyleId)
                            .to(Style::Table, Style::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlbumStyle::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Style::Table).to_owned())
            .await
    }
}
