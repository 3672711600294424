use log::{info, warn};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, TransactionTrait,
};

use entities::artist;

use super::parse::truncate;
use super::sheet::Sheet;
use super::{settle, ConflictPolicy, ImportOptions, ImportSummary, RowOutcome, PREVIEW_ROWS};

/// Artist names come from the first column of each data row.
pub async fn import_artists(
    sheet: &Sheet,
    options: &ImportOptions,
    connection: &DatabaseConnection,
) -> Result<ImportSummary, DbErr> {
    let names: Vec<String> = sheet
        .records(options.limit)
        .filter_map(|record| record.first().text())
        .filter(|name| name != "None")
        .map(|name| truncate(&name, artist::NAME_MAX))
        .collect();
    info!("Artists found in {}: {}", sheet.name, names.len());

    let mut summary = ImportSummary::new("artists", names.len(), options.dry_run);
    if options.dry_run {
        summary.preview = names.iter().take(PREVIEW_ROWS).cloned().collect();
        return Ok(summary);
    }

    for name in &names {
        let outcome = match connection.begin().await {
            Ok(txn) => {
                let result = artist_row(&txn, name, options.policy).await;
                settle(txn, result).await
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(outcome) => summary.record(outcome),
            Err(err) => {
                warn!("Error with '{}': {}", name, err);
                summary.errors.push(format!("Error with '{}': {}", name, err));
            }
        }
    }
    summary.total = artist::Entity::find().count(connection).await?;
    Ok(summary)
}

async fn artist_row<C: ConnectionTrait>(
    db: &C,
    name: &str,
    policy: ConflictPolicy,
) -> Result<RowOutcome, DbErr> {
    if let Some(existing) = queries::get_artist_by_name(db, name).await? {
        if policy == ConflictPolicy::Skip {
            return Ok(RowOutcome::Skipped);
        }
        let mut active: artist::ActiveModel = existing.into();
        active.name = ActiveValue::Set(name.to_string());
        active.update(db).await?;
        return Ok(RowOutcome::Updated);
    }
    artist::ActiveModel {
        name: ActiveValue::Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(RowOutcome::Created)
}
