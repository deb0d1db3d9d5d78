use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub job_posting_id: Option<String>,
    pub job_url: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_applied: bool,
    pub apply_status: String,
    pub is_offered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A raw posting as returned by a scraper, before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedJob {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub job_posting_id: Option<String>,
    pub job_url: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStatus {
    #[default]
    NotApplied,
    Applied,
    Interviewing,
    Waiting,
    Offered,
}

impl ApplyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyStatus::NotApplied => "not_applied",
            ApplyStatus::Applied => "applied",
            ApplyStatus::Interviewing => "interviewing",
            ApplyStatus::Waiting => "waiting",
            ApplyStatus::Offered => "offered",
        }
    }
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplyStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_applied" => Ok(ApplyStatus::NotApplied),
            "applied" => Ok(ApplyStatus::Applied),
            "interviewing" => Ok(ApplyStatus::Interviewing),
            "waiting" => Ok(ApplyStatus::Waiting),
            "offered" => Ok(ApplyStatus::Offered),
            other => Err(AppError::BadRequest(format!("Unknown apply status '{other}'"))),
        }
    }
}

/// Row values for an insert. Timestamps and the initial status are always
/// stamped here, whatever the scraped input carried.
#[derive(Debug, Clone)]
pub struct JobInsert {
    pub posting: ScrapedJob,
    pub is_applied: bool,
    pub apply_status: ApplyStatus,
    pub is_offered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobInsert {
    pub fn stamped(posting: ScrapedJob, now: DateTime<Utc>) -> Self {
        Self {
            posting,
            is_applied: false,
            apply_status: ApplyStatus::NotApplied,
            is_offered: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-editable fields. `job_url` is not among them: it only ever comes
/// from a scraper, and description fetches follow it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateJob {
    pub location: Option<String>,
    pub is_applied: Option<bool>,
    pub apply_status: Option<ApplyStatus>,
    pub is_offered: Option<bool>,
}

impl UpdateJob {
    /// Status change that keeps the applied/offered flags in line with it.
    pub fn for_status(status: ApplyStatus) -> Self {
        Self {
            apply_status: Some(status),
            is_applied: Some(status != ApplyStatus::NotApplied),
            is_offered: Some(status == ApplyStatus::Offered),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    pub apply_status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl JobFilters {
    pub fn status(&self) -> Result<Option<ApplyStatus>, AppError> {
        self.apply_status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .transpose()
    }

    /// Returns (limit, offset).
    pub fn window(&self) -> (i64, i64) {
        let per_page = self.per_page.unwrap_or(50).clamp(1, 100);
        let page = self.page.unwrap_or(1).max(1);
        let offset = (page - 1).saturating_mul(per_page);
        (per_page, offset)
    }
}

impl Job {
    /// Merge a partial update into this job and stamp `updated_at`.
    pub fn apply_update(&mut self, input: UpdateJob, now: DateTime<Utc>) {
        if let Some(location) = input.location {
            self.location = Some(location);
        }
        if let Some(is_applied) = input.is_applied {
            self.is_applied = is_applied;
        }
        if let Some(status) = input.apply_status {
            self.apply_status = status.as_str().to_string();
        }
        if let Some(is_offered) = input.is_offered {
            self.is_offered = is_offered;
        }
        self.updated_at = now;
    }

    pub async fn all(pool: &PgPool) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(jobs)
    }

    pub async fn list(pool: &PgPool, filters: &JobFilters) -> Result<Vec<Job>, AppError> {
        let status = filters.status()?.map(|s| s.as_str());
        let (limit, offset) = filters.window();

        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE ($1::text IS NULL OR apply_status = $1) ORDER BY date DESC NULLS LAST, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(jobs)
    }

    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(job)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Job, AppError> {
        Self::find(pool, id).await?.ok_or(AppError::JobNotFound(id))
    }

    /// Insert a batch in one transaction, in the given order.
    pub async fn create_many(pool: &PgPool, postings: Vec<ScrapedJob>) -> Result<Vec<Job>, AppError> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(postings.len());

        for posting in postings {
            let row = JobInsert::stamped(posting, now);
            let job = sqlx::query_as::<_, Job>(
                "INSERT INTO jobs (title, company, location, job_posting_id, job_url, date, is_applied, apply_status, is_offered, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
            )
            .bind(&row.posting.title)
            .bind(&row.posting.company)
            .bind(&row.posting.location)
            .bind(&row.posting.job_posting_id)
            .bind(&row.posting.job_url)
            .bind(row.posting.date)
            .bind(row.is_applied)
            .bind(row.apply_status.as_str())
            .bind(row.is_offered)
            .bind(row.created_at)
            .bind(row.updated_at)
            .fetch_one(&mut *tx)
            .await?;
            created.push(job);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn update(pool: &PgPool, id: i32, input: UpdateJob) -> Result<Job, AppError> {
        let mut job = Self::get(pool, id).await?;
        job.apply_update(input, Utc::now());

        let job = sqlx::query_as::<_, Job>(
            "UPDATE jobs SET location = $2, is_applied = $3, apply_status = $4, is_offered = $5, updated_at = $6 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&job.location)
        .bind(job.is_applied)
        .bind(&job.apply_status)
        .bind(job.is_offered)
        .bind(job.updated_at)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::JobNotFound(id))?;
        Ok(job)
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::JobNotFound(id));
        }
        Ok(())
    }
}
