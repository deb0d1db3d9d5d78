use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::job::{ApplyStatus, Job, JobFilters, UpdateJob};
use crate::models::job_description::JobDescription;
use crate::routes::AppState;
use crate::services::description::fetch_and_store_description;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub apply_status: ApplyStatus,
}

pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> Result<Json<Vec<Job>>, AppError> {
    let jobs = state.store.list_jobs(&filters).await?;
    Ok(Json(jobs))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Job>, AppError> {
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or(AppError::JobNotFound(id))?;
    Ok(Json(job))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateJob>,
) -> Result<Json<Job>, AppError> {
    let job = state.store.update_job(id, input).await?;
    Ok(Json(job))
}

/// PATCH /api/jobs/{id}/status
///
/// Sets the apply status and keeps `is_applied`/`is_offered` consistent with it.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<StatusUpdate>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .store
        .update_job(id, UpdateJob::for_status(input.apply_status))
        .await?;
    tracing::info!("Job {id} status set to {}", input.apply_status);
    Ok(Json(job))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.store.delete_job(id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// GET /api/jobs/{id}/description
///
/// Serves the stored description, scraping and storing it on first request.
pub async fn description(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JobDescription>, AppError> {
    if let Some(stored) = state.store.get_description(id).await? {
        return Ok(Json(stored));
    }
    let description =
        fetch_and_store_description(state.store.as_ref(), state.scraper.as_ref(), id).await?;
    Ok(Json(description))
}
