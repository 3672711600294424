//! Batch imports from spreadsheets. Each data row is written in its own
//! transaction; a failing row is recorded in the summary and the batch
//! goes on.

use std::fmt;

use sea_orm::{DatabaseTransaction, DbErr};

use crate::error::AppError;

pub mod albums;
pub mod artists;
pub mod parse;
pub mod sheet;
pub mod tracks;

pub use albums::import_albums;
pub use artists::import_artists;
pub use sheet::{Cell, Sheet};
pub use tracks::import_tracks;

/// Rows shown by a dry run.
pub const PREVIEW_ROWS: usize = 5;
/// Error lines printed in a summary.
pub const MAX_REPORTED_ERRORS: usize = 20;

/// What to do with a row whose record already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    #[default]
    Skip,
    Update,
}

impl ConflictPolicy {
    pub fn from_flags(skip_existing: bool, update_existing: bool) -> Result<Self, AppError> {
        match (skip_existing, update_existing) {
            (true, true) => Err(AppError::BadRequest(
                "--skip-existing and --update-existing cannot be used together".to_string(),
            )),
            (_, true) => Ok(ConflictPolicy::Update),
            _ => Ok(ConflictPolicy::Skip),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ImportOptions {
    pub limit: Option<usize>,
    pub dry_run: bool,
    pub policy: ConflictPolicy,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub subject: &'static str,
    pub rows: usize,
    pub dry_run: bool,
    pub preview: Vec<String>,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub missing_album: usize,
    pub errors: Vec<String>,
    pub total: u64,
}

impl ImportSummary {
    fn new(subject: &'static str, rows: usize, dry_run: bool) -> Self {
        ImportSummary {
            subject,
            rows,
            dry_run,
            ..Default::default()
        }
    }

    fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created => self.created += 1,
            RowOutcome::Updated => self.updated += 1,
            RowOutcome::Skipped => self.skipped += 1,
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows to process: {}", self.rows)?;
        if self.dry_run {
            writeln!(f, "DRY RUN - nothing was written")?;
            for (index, line) in self.preview.iter().enumerate() {
                writeln!(f, "[Preview {}] {}", index + 1, line)?;
            }
            return Ok(());
        }
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "{} import completed", self.subject)?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Created: {}", self.created)?;
        writeln!(f, "Updated: {}", self.updated)?;
        writeln!(f, "Skipped: {}", self.skipped)?;
        if self.missing_album > 0 {
            writeln!(f, "Without a matching album: {}", self.missing_album)?;
        }
        writeln!(f, "Total {} in the database: {}", self.subject, self.total)?;
        if !self.errors.is_empty() {
            writeln!(f, "Errors: {}", self.errors.len())?;
            for error in self.errors.iter().take(MAX_REPORTED_ERRORS) {
                writeln!(f, " - {}", error)?;
            }
            if self.errors.len() > MAX_REPORTED_ERRORS {
                writeln!(f, "... {} more errors", self.errors.len() - MAX_REPORTED_ERRORS)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowOutcome {
    Created,
    Updated,
    Skipped,
}

/// Commits on success, rolls back on failure.
async fn settle<T>(txn: DatabaseTransaction, result: Result<T, DbErr>) -> Result<T, DbErr> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            txn.rollback().await?;
            Err(err)
        }
    }
}
