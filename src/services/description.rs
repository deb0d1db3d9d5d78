use crate::error::AppError;
use crate::models::job_description::JobDescription;
use crate::scrapers::JobScraper;
use crate::store::JobStore;

/// Scrape the description of a stored job. Nothing is persisted.
pub async fn fetch_description(
    store: &dyn JobStore,
    scraper: &dyn JobScraper,
    job_id: i32,
) -> Result<String, AppError> {
    let job = store
        .get_job(job_id)
        .await?
        .ok_or(AppError::JobNotFound(job_id))?;

    let text = match job.job_url.as_deref() {
        Some(url) => scraper.get_job_description(url).await,
        None => String::new(),
    };

    if text.trim().is_empty() {
        return Err(AppError::ScrapeFailed(format!(
            "no description returned for job {job_id}"
        )));
    }

    Ok(text)
}

/// Scrape the description of a stored job and save it as its JobDescription.
pub async fn fetch_and_store_description(
    store: &dyn JobStore,
    scraper: &dyn JobScraper,
    job_id: i32,
) -> Result<JobDescription, AppError> {
    let text = fetch_description(store, scraper, job_id).await?;
    let description = store.save_description(job_id, &text).await?;
    tracing::info!("Stored description for job {job_id} ({} chars)", text.len());
    Ok(description)
}
