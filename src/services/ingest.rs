use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::models::job::{Job, ScrapedJob};
use crate::scrapers::JobScraper;
use crate::store::JobStore;

#[derive(Debug, Serialize)]
pub struct IngestResult {
    pub count: usize,
    pub new_jobs: Vec<Job>,
}

impl IngestResult {
    fn empty() -> Self {
        Self {
            count: 0,
            new_jobs: Vec::new(),
        }
    }
}

/// Dedup identity of a posting: (title, company, date).
#[derive(Debug, PartialEq, Eq, Hash)]
struct PostingKey<'a> {
    title: &'a str,
    company: &'a str,
    date: Option<NaiveDate>,
}

impl<'a> From<&'a Job> for PostingKey<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            title: &job.title,
            company: &job.company,
            date: job.date,
        }
    }
}

impl<'a> From<&'a ScrapedJob> for PostingKey<'a> {
    fn from(job: &'a ScrapedJob) -> Self {
        Self {
            title: &job.title,
            company: &job.company,
            date: job.date,
        }
    }
}

/// Scrape, drop postings already stored, and persist the rest newest first.
pub async fn ingest_new_jobs(
    store: &dyn JobStore,
    scraper: &dyn JobScraper,
) -> Result<IngestResult, AppError> {
    let scraped = scraper.scrape_jobs().await?;
    if scraped.is_empty() {
        tracing::warn!("No jobs scraped by '{}'", scraper.name());
        return Ok(IngestResult::empty());
    }
    let scraped_count = scraped.len();

    let existing = store.get_all_jobs().await?;
    let mut new_jobs = filter_new(scraped, &existing);
    sort_newest_first(&mut new_jobs, Utc::now().date_naive());

    let created = store.create_jobs(new_jobs).await?;
    tracing::info!(
        "Ingest from '{}': {scraped_count} scraped, {} new",
        scraper.name(),
        created.len()
    );

    Ok(IngestResult {
        count: created.len(),
        new_jobs: created,
    })
}

/// Keep scraped postings whose triple matches no existing job.
fn filter_new(scraped: Vec<ScrapedJob>, existing: &[Job]) -> Vec<ScrapedJob> {
    let known: HashSet<PostingKey<'_>> = existing.iter().map(PostingKey::from).collect();
    scraped
        .into_iter()
        .filter(|job| !known.contains(&PostingKey::from(job)))
        .collect()
}

/// Stable sort by date descending; undated postings count as `today`.
fn sort_newest_first(jobs: &mut [ScrapedJob], today: NaiveDate) {
    jobs.sort_by(|a, b| b.date.unwrap_or(today).cmp(&a.date.unwrap_or(today)));
}
