//! Attaches local image files to artists and albums.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{error, info};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::explorer::{find_image, slugify, ImageMatch};

pub const ARTIST_PHOTO_DIR: &str = "artists";
pub const ALBUM_COVER_DIR: &str = "album_covers";
const PREVIEW_ITEMS: usize = 5;

#[derive(Clone, Debug, Default)]
pub struct MediaOptions {
    pub images_dirs: Vec<PathBuf>,
    pub overwrite: bool,
    pub clear: bool,
    pub limit: Option<u64>,
    pub dry_run: bool,
}

#[derive(Debug, Default)]
pub struct MediaSummary {
    pub subject: &'static str,
    pub processed: usize,
    pub cleared: u64,
    pub preview: Vec<String>,
    pub updated: usize,
    pub skipped_existing: usize,
    pub skipped_missing: usize,
    pub errors: usize,
}

impl fmt::Display for MediaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} to process: {}", self.subject, self.processed)?;
        if self.cleared > 0 {
            writeln!(f, "Cleared {} existing images", self.cleared)?;
        }
        for line in &self.preview {
            writeln!(f, "[Preview] {}", line)?;
        }
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Updated: {}", self.updated)?;
        writeln!(f, "Skipped (image already present): {}", self.skipped_existing)?;
        writeln!(f, "Without a matching image: {}", self.skipped_missing)?;
        writeln!(f, "Errors: {}", self.errors)
    }
}

/// A record that may receive an image.
struct Candidate {
    id: i32,
    name: String,
    current: Option<String>,
}

pub async fn load_artist_photos(
    connection: &DatabaseConnection,
    media_root: &Path,
    options: &MediaOptions,
) -> Result<MediaSummary, AppError> {
    check_dirs(&options.images_dirs)?;
    let mut summary = MediaSummary {
        subject: "Artists",
        ..Default::default()
    };
    if options.clear {
        if options.dry_run {
            info!("[DRY RUN] Would clear every artist photo");
        } else {
            summary.cleared = queries::clear_artist_photos(connection).await?;
        }
    }
    let candidates = queries::artists_by_id(connection, options.limit)
        .await?
        .into_iter()
        .map(|artist| Candidate {
            id: artist.id,
            name: artist.name,
            current: artist.photo,
        })
        .collect::<Vec<_>>();

    let mut reconcile = Reconcile {
        media_root,
        options,
        folder: ARTIST_PHOTO_DIR,
        summary,
    };
    for candidate in candidates {
        if let Some(stored) = reconcile.attach(&candidate).await {
            match queries::set_artist_photo(connection, candidate.id, Some(stored)).await {
                Ok(()) => reconcile.summary.updated += 1,
                Err(err) => {
                    error!("Cannot update artist {}: {}", candidate.id, err);
                    reconcile.summary.errors += 1;
                }
            }
        }
    }
    Ok(reconcile.summary)
}

pub async fn load_album_covers(
    connection: &DatabaseConnection,
    media_root: &Path,
    options: &MediaOptions,
) -> Result<MediaSummary, AppError> {
    check_dirs(&options.images_dirs)?;
    let candidates = queries::albums_by_id(connection, options.limit)
        .await?
        .into_iter()
        .map(|(album, _)| Candidate {
            id: album.id,
            name: album.title,
            current: album.cover,
        })
        .collect::<Vec<_>>();

    let mut reconcile = Reconcile {
        media_root,
        options,
        folder: ALBUM_COVER_DIR,
        summary: MediaSummary {
            subject: "Albums",
            ..Default::default()
        },
    };
    for candidate in candidates {
        if let Some(stored) = reconcile.attach(&candidate).await {
            match queries::set_album_cover(connection, candidate.id, Some(stored)).await {
                Ok(()) => reconcile.summary.updated += 1,
                Err(err) => {
                    error!("Cannot update album {}: {}", candidate.id, err);
                    reconcile.summary.errors += 1;
                }
            }
        }
    }
    Ok(reconcile.summary)
}

fn check_dirs(dirs: &[PathBuf]) -> Result<(), AppError> {
    if dirs.is_empty() {
        return Err(AppError::BadRequest("no image directory given".to_string()));
    }
    match dirs.iter().find(|dir| !dir.is_dir()) {
        Some(missing) => Err(AppError::BadRequest(format!(
            "image directory not found: {}",
            missing.display()
        ))),
        None => Ok(()),
    }
}

struct Reconcile<'a> {
    media_root: &'a Path,
    options: &'a MediaOptions,
    folder: &'static str,
    summary: MediaSummary,
}

impl Reconcile<'_> {
    /// Copies the matching image into the media root and returns the stored
    /// relative path for the caller to save. `None` when nothing should be
    /// written; dry runs count their would-be updates here.
    async fn attach(&mut self, candidate: &Candidate) -> Option<String> {
        self.summary.processed += 1;
        let found = match find_image(&self.options.images_dirs, &candidate.name) {
            Ok(Some(found)) => found,
            Ok(None) => {
                self.summary.skipped_missing += 1;
                return None;
            }
            Err(err) => {
                error!("Cannot search images for '{}': {}", candidate.name, err);
                self.summary.errors += 1;
                return None;
            }
        };
        let has_media = candidate.current.as_deref().is_some_and(|p| !p.is_empty());
        if has_media && !self.options.overwrite && !self.options.clear {
            self.summary.skipped_existing += 1;
            return None;
        }
        if self.options.dry_run {
            if self.summary.preview.len() < PREVIEW_ITEMS {
                self.summary
                    .preview
                    .push(format!("{} <- {}", candidate.name, file_name(&found)));
            }
            self.summary.updated += 1;
            return None;
        }
        let stored = stored_path(self.folder, candidate.id, &candidate.name, &found.path);
        match copy_into(self.media_root, &stored, &found.path).await {
            Ok(()) => {
                info!("{} <- {}", candidate.name, file_name(&found));
                Some(stored)
            }
            Err(err) => {
                error!("Cannot save {} for '{}': {}", file_name(&found), candidate.name, err);
                self.summary.errors += 1;
                None
            }
        }
    }
}

fn file_name(found: &ImageMatch) -> String {
    found
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<folder>/<id>_<slug><.ext>` with the extension lowercased.
pub fn stored_path(folder: &str, id: i32, name: &str, source: &Path) -> String {
    let ext = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();
    format!("{}/{}_{}{}", folder, id, slugify(name), ext)
}

async fn copy_into(media_root: &Path, stored: &str, source: &Path) -> std::io::Result<()> {
    let target = media_root.join(stored);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::copy(source, &target).await?;
    Ok(())
}
