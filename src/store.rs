use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::job::{Job, JobFilters, ScrapedJob, UpdateJob};
use crate::models::job_description::JobDescription;

/// Persistence seam for jobs and their descriptions.
///
/// Implementations own timestamp and default-status stamping: callers hand
/// over raw postings or partial updates and get back stored rows.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get_all_jobs(&self) -> Result<Vec<Job>, AppError>;

    async fn get_job(&self, id: i32) -> Result<Option<Job>, AppError>;

    /// Store postings in order, returning the created rows.
    async fn create_jobs(&self, jobs: Vec<ScrapedJob>) -> Result<Vec<Job>, AppError>;

    async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>, AppError>;

    async fn update_job(&self, id: i32, input: UpdateJob) -> Result<Job, AppError>;

    async fn delete_job(&self, id: i32) -> Result<(), AppError>;

    async fn get_description(&self, job_id: i32) -> Result<Option<JobDescription>, AppError>;

    async fn save_description(&self, job_id: i32, text: &str)
    -> Result<JobDescription, AppError>;
}

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn get_all_jobs(&self) -> Result<Vec<Job>, AppError> {
        Job::all(&self.pool).await
    }

    async fn get_job(&self, id: i32) -> Result<Option<Job>, AppError> {
        Job::find(&self.pool, id).await
    }

    async fn create_jobs(&self, jobs: Vec<ScrapedJob>) -> Result<Vec<Job>, AppError> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }
        Job::create_many(&self.pool, jobs).await
    }

    async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>, AppError> {
        Job::list(&self.pool, filters).await
    }

    async fn update_job(&self, id: i32, input: UpdateJob) -> Result<Job, AppError> {
        Job::update(&self.pool, id, input).await
    }

    async fn delete_job(&self, id: i32) -> Result<(), AppError> {
        Job::delete(&self.pool, id).await
    }

    async fn get_description(&self, job_id: i32) -> Result<Option<JobDescription>, AppError> {
        JobDescription::find_by_job(&self.pool, job_id).await
    }

    async fn save_description(
        &self,
        job_id: i32,
        text: &str,
    ) -> Result<JobDescription, AppError> {
        JobDescription::upsert(&self.pool, job_id, text).await
    }
}
