use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::pdf_report::{render_report, FILE_NAME};
use crate::AppState;

pub async fn artists_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    let report = queries::artist_report(&state.connection).await?;
    let media_root = state.media_root.clone();
    let bytes = tokio::task::spawn_blocking(move || render_report(&report, &media_root))
        .await
        .map_err(|err| AppError::Pdf(err.to_string()))??;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", FILE_NAME),
            ),
        ],
        bytes,
    )
        .into_response())
}
