// In-memory stand-ins for the store and scraper seams, used by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::error::AppError;
use crate::models::job::{Job, JobFilters, JobInsert, ScrapedJob, UpdateJob};
use crate::models::job_description::JobDescription;
use crate::scrapers::JobScraper;
use crate::store::JobStore;

/// Build a scraped posting with just the dedup triple filled in.
pub fn scraped(title: &str, company: &str, date: &str) -> ScrapedJob {
    ScrapedJob {
        title: title.to_string(),
        company: company.to_string(),
        location: None,
        job_posting_id: None,
        job_url: None,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
    }
}

#[derive(Debug, Default)]
struct StoreState {
    jobs: Vec<Job>,
    descriptions: Vec<JobDescription>,
    next_job_id: i32,
    next_description_id: i32,
    create_calls: usize,
    fail_creates: bool,
}

impl StoreState {
    fn insert(&mut self, posting: ScrapedJob) -> Job {
        self.next_job_id += 1;
        let row = JobInsert::stamped(posting, Utc::now());
        let job = Job {
            id: self.next_job_id,
            title: row.posting.title,
            company: row.posting.company,
            location: row.posting.location,
            job_posting_id: row.posting.job_posting_id,
            job_url: row.posting.job_url,
            date: row.posting.date,
            is_applied: row.is_applied,
            apply_status: row.apply_status.as_str().to_string(),
            is_offered: row.is_offered,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        self.jobs.push(job.clone());
        job
    }
}

/// In-memory job store with sequential ids and call recording.
#[derive(Debug, Clone, Default)]
pub struct MockJobStore {
    state: Arc<Mutex<StoreState>>,
}

impl MockJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed existing jobs. Seeding does not count as a create call.
    pub fn with_jobs(self, postings: Vec<ScrapedJob>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for posting in postings {
                state.insert(posting);
            }
        }
        self
    }

    /// Make every `create_jobs` call fail with a database error.
    pub fn failing_creates(self) -> Self {
        self.state.lock().unwrap().fail_creates = true;
        self
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.state.lock().unwrap().jobs.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn description_for(&self, job_id: i32) -> Option<JobDescription> {
        self.state
            .lock()
            .unwrap()
            .descriptions
            .iter()
            .find(|d| d.job_id == job_id)
            .cloned()
    }
}

#[async_trait]
impl JobStore for MockJobStore {
    async fn get_all_jobs(&self) -> Result<Vec<Job>, AppError> {
        Ok(self.jobs())
    }

    async fn get_job(&self, id: i32) -> Result<Option<Job>, AppError> {
        Ok(self.jobs().into_iter().find(|j| j.id == id))
    }

    async fn create_jobs(&self, jobs: Vec<ScrapedJob>) -> Result<Vec<Job>, AppError> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        if state.fail_creates {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(jobs.into_iter().map(|posting| state.insert(posting)).collect())
    }

    async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>, AppError> {
        let status = filters.status()?;
        let (limit, offset) = filters.window();
        let mut jobs: Vec<Job> = self
            .jobs()
            .into_iter()
            .filter(|j| status.is_none_or(|s| j.apply_status == s.as_str()))
            .collect();
        jobs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(jobs
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn update_job(&self, id: i32, input: UpdateJob) -> Result<Job, AppError> {
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(AppError::JobNotFound(id))?;
        job.apply_update(input, Utc::now());
        Ok(job.clone())
    }

    async fn delete_job(&self, id: i32) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let before = state.jobs.len();
        state.jobs.retain(|j| j.id != id);
        if state.jobs.len() == before {
            return Err(AppError::JobNotFound(id));
        }
        state.descriptions.retain(|d| d.job_id != id);
        Ok(())
    }

    async fn get_description(&self, job_id: i32) -> Result<Option<JobDescription>, AppError> {
        Ok(self.description_for(job_id))
    }

    async fn save_description(
        &self,
        job_id: i32,
        text: &str,
    ) -> Result<JobDescription, AppError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.descriptions.iter_mut().find(|d| d.job_id == job_id) {
            existing.job_description = text.to_string();
            return Ok(existing.clone());
        }
        state.next_description_id += 1;
        let description = JobDescription {
            id: state.next_description_id,
            job_id,
            job_description: text.to_string(),
        };
        state.descriptions.push(description.clone());
        Ok(description)
    }
}

/// Scraper returning canned postings and descriptions.
#[derive(Debug, Clone, Default)]
pub struct MockScraper {
    jobs: Vec<ScrapedJob>,
    descriptions: HashMap<String, String>,
    description_calls: Arc<Mutex<Vec<String>>>,
    scrape_error: Option<String>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(mut self, jobs: Vec<ScrapedJob>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_description(mut self, url: &str, text: &str) -> Self {
        self.descriptions.insert(url.to_string(), text.to_string());
        self
    }

    /// Make `scrape_jobs` fail with an internal error carrying `msg`.
    pub fn failing_scrape(mut self, msg: &str) -> Self {
        self.scrape_error = Some(msg.to_string());
        self
    }

    /// URLs passed to `get_job_description`, in call order.
    pub fn description_calls(&self) -> Vec<String> {
        self.description_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobScraper for MockScraper {
    fn name(&self) -> &str {
        "mock"
    }

    async fn scrape_jobs(&self) -> Result<Vec<ScrapedJob>, AppError> {
        if let Some(msg) = &self.scrape_error {
            return Err(AppError::Internal(msg.clone()));
        }
        Ok(self.jobs.clone())
    }

    async fn get_job_description(&self, url: &str) -> String {
        self.description_calls.lock().unwrap().push(url.to_string());
        self.descriptions.get(url).cloned().unwrap_or_default()
    }
}
