use axum::Json;
use axum::extract::State;

use crate::error::AppError;
use crate::routes::AppState;
use crate::services::ingest::{IngestResult, ingest_new_jobs};

/// GET|POST /api/sync-new-jobs
///
/// Runs one scrape and stores postings not seen before. Concurrent calls
/// are not serialised and may both insert the same posting.
pub async fn sync_new_jobs(State(state): State<AppState>) -> Result<Json<IngestResult>, AppError> {
    let result = ingest_new_jobs(state.store.as_ref(), state.scraper.as_ref()).await?;
    Ok(Json(result))
}
