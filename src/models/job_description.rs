use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct JobDescription {
    pub id: i32,
    pub job_id: i32,
    pub job_description: String,
}

impl JobDescription {
    pub async fn find_by_job(pool: &PgPool, job_id: i32) -> Result<Option<JobDescription>, AppError> {
        let description = sqlx::query_as::<_, JobDescription>(
            "SELECT * FROM job_descriptions WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
        Ok(description)
    }

    /// Insert or replace the single description owned by `job_id`.
    pub async fn upsert(pool: &PgPool, job_id: i32, text: &str) -> Result<JobDescription, AppError> {
        let description = sqlx::query_as::<_, JobDescription>(
            "INSERT INTO job_descriptions (job_id, job_description) VALUES ($1, $2)
             ON CONFLICT (job_id) DO UPDATE SET job_description = EXCLUDED.job_description
             RETURNING *",
        )
        .bind(job_id)
        .bind(text)
        .fetch_one(pool)
        .await?;
        Ok(description)
    }
}
