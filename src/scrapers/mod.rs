pub mod linkedin;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::job::ScrapedJob;

/// Trait that all job scrapers must implement.
/// A scraper lists postings from an external board and fetches the full
/// description for a single posting URL.
#[async_trait]
pub trait JobScraper: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the current postings from the external source.
    async fn scrape_jobs(&self) -> Result<Vec<ScrapedJob>, AppError>;

    /// Fetch the description text behind `url`. Returns an empty string
    /// when nothing could be scraped.
    async fn get_job_description(&self, url: &str) -> String;
}
