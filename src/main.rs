use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{error, info};
use sea_orm::{ConnectOptions, Database};

use recordshelf::bootstrap::ensure_initialized;
use recordshelf::commands::{self, ImportKind, NewUser};
use recordshelf::config::Config;
use recordshelf::error::AppError;
use recordshelf::import::{ConflictPolicy, ImportOptions};
use recordshelf::media_sync::MediaOptions;
use recordshelf::{build_router, AppState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, short, default_value_t = 3)]
    verbosity: usize,
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
    #[arg(long, short)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web catalog.
    Serve,
    /// Import artist names from the first column of a spreadsheet.
    ImportArtists(ImportArgs),
    /// Import albums from a spreadsheet.
    ImportAlbums(ImportArgs),
    /// Import tracks from a spreadsheet.
    ImportTracks(ImportArgs),
    /// Attach artist photos from image directories.
    LoadArtistPhotos {
        #[command(flatten)]
        media: MediaArgs,
        /// Empty every artist photo first.
        #[arg(long)]
        clear: bool,
    },
    /// Attach album covers from image directories.
    LoadAlbumCovers {
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Create a user account.
    CreateUser {
        username: String,
        password: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        staff: bool,
        #[arg(long)]
        superuser: bool,
    },
}

#[derive(ClapArgs)]
struct ImportArgs {
    #[arg(long)]
    file: PathBuf,
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long)]
    dry_run: bool,
    #[arg(long, conflicts_with = "update_existing")]
    skip_existing: bool,
    #[arg(long)]
    update_existing: bool,
}

impl ImportArgs {
    fn options(&self) -> Result<ImportOptions, AppError> {
        Ok(ImportOptions {
            limit: self.limit,
            dry_run: self.dry_run,
            policy: ConflictPolicy::from_flags(self.skip_existing, self.update_existing)?,
        })
    }
}

#[derive(ClapArgs)]
struct MediaArgs {
    #[arg(long = "images-dir", required = true)]
    images_dirs: Vec<PathBuf>,
    #[arg(long)]
    overwrite: bool,
    #[arg(long)]
    limit: Option<u64>,
    #[arg(long)]
    dry_run: bool,
}

impl MediaArgs {
    fn options(self, clear: bool) -> MediaOptions {
        MediaOptions {
            images_dirs: self.images_dirs,
            overwrite: self.overwrite,
            clear,
            limit: self.limit,
            dry_run: self.dry_run,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    if let Err(err) = stderrlog::new()
        .verbosity(args.verbosity)
        .quiet(args.quiet)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
    {
        eprintln!("Cannot initialize logging: {}", err);
    }

    info!("Configuration path: {}", args.config.display());
    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return Ok(());
        }
    };
    let mut options = ConnectOptions::new(config.database.to_owned());
    options.max_connections(5).sqlx_logging(false);
    let connection = match Database::connect(options).await {
        Ok(connection) => connection,
        Err(err) => {
            error!("Error connecting to database: {}", err);
            return Ok(());
        }
    };
    ensure_initialized(&connection, config.superuser.as_ref()).await;

    let output = match args.command {
        Command::Serve => {
            let state = AppState::new(connection, config.media_root.to_owned());
            let app = build_router(state);
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
            info!("Listening on 0.0.0.0:{}", config.port);
            axum::serve(listener, app).await?;
            return Ok(());
        }
        Command::ImportArtists(import) => {
            commands::run_import(&connection, ImportKind::Artists, &import.file, &import.options()?)
                .await
        }
        Command::ImportAlbums(import) => {
            commands::run_import(&connection, ImportKind::Albums, &import.file, &import.options()?)
                .await
        }
        Command::ImportTracks(import) => {
            commands::run_import(&connection, ImportKind::Tracks, &import.file, &import.options()?)
                .await
        }
        Command::LoadArtistPhotos { media, clear } => {
            commands::run_artist_photos(&connection, &config.media_root, &media.options(clear))
                .await
        }
        Command::LoadAlbumCovers { media } => {
            commands::run_album_covers(&connection, &config.media_root, &media.options(false))
                .await
        }
        Command::CreateUser {
            username,
            password,
            email,
            staff,
            superuser,
        } => {
            commands::create_user(
                &connection,
                NewUser {
                    username: &username,
                    password: &password,
                    email: &email,
                    staff,
                    superuser,
                },
            )
            .await
        }
    };
    match output {
        Ok(text) => println!("{}", text),
        Err(err) => error!("{}", err),
    }
    Ok(())
}
