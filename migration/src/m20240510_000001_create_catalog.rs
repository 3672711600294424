use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240510_000001_create_catalog" // Make sure this matches with the file name
    }
}

#[derive(Iden)]
pub enum Artist {
    Table,
    Id,
    Name,
    Photo,
    Profile,
    Sites,
    Members,
}

#[derive(Iden)]
pub enum Album {
    Table,
    Id,
    Title,
    Label,
    CatalogNumber,
    Genre,
    Format,
    ReleaseDate,
    Storage,
    Notes,
    Cover,
    ArtistId,
    Cost,
    Closed,
}

#[derive(Iden)]
enum Track {
    Table,
    Id,
    Title,
    Section,
    Ordinal,
    Credits,
    Duration,
    AlbumId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artist::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Artist::Photo).string().null())
                    .col(ColumnDef::new(Artist::Profile).text().null())
                    .col(ColumnDef::new(Artist::Sites).string_len(100).null())
                    .col(ColumnDef::new(Artist::Members).string_len(300).null())
                    .to_owned(),
            )
            .await?;

        // Can't have an Album without an Artist
        manager
            .create_table(
                Table::create()
                    .table(Album::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Album::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Album::Title).string_len(140).not_null())
                    .col(ColumnDef::new(Album::Label).string_len(40).null())
                    .col(ColumnDef::new(Album::CatalogNumber).string_len(30).null())
                    .col(ColumnDef::new(Album::Genre).string_len(30).null())
                    .col(ColumnDef::new(Album::Format).string_len(20).null())
                    .col(ColumnDef::new(Album::ReleaseDate).date().null())
                    .col(ColumnDef::new(Album::Storage).string_len(10).null())
                    .col(ColumnDef::new(Album::Notes).text().null())
                    .col(ColumnDef::new(Album::Cover).string().null())
                    .col(ColumnDef::new(Album::ArtistId).integer().not_null())
                    .col(ColumnDef::new(Album::Cost).double().not_null().default(0.0))
                    .col(ColumnDef::new(Album::Closed).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-album-artist_id")
                            .from(Album::Table, Album::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Can't have a Track without an Album
        manager
            .create_table(
                Table::create()
                    .table(Track::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Track::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Track::Title).string_len(150).not_null())
                    .col(ColumnDef::new(Track::Section).string_len(2).null())
                    .col(ColumnDef::new(Track::Ordinal).string_len(3).null())
                    .col(ColumnDef::new(Track::Credits).string_len(100).null())
                    .col(ColumnDef::new(Track::Duration).string_len(5).null())
                    .col(ColumnDef::new(Track::AlbumId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-track-album_id")
                            .from(Track::Table, Track::AlbumId)
                            .to(Album::Table, Album::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Track::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Album::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artist::Table).to_owned())
            .await?;
        Ok(())
    }
}
