use sqlx::PgPool;

use crate::pkg::internal::adaptors::applications::spec::ApplicationEntry;
use crate::prelude::Result;

#[derive(Debug)]
pub struct CreateApplicationData {
    pub job_id: i32,
    pub resume_path: Option<String>,
    pub resume_pool_id: Option<i32>,
    pub uploaded_by_user_id: String,
    pub original_filename: String,
}

pub struct ApplicationMutator<'a> {
    pool: &'a PgPool,
}

impl<'a> ApplicationMutator<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        ApplicationMutator { pool }
    }

    pub async fn create(&mut self, data: CreateApplicationData) -> Result<ApplicationEntry> {
        let row = sqlx::query_as::<_, ApplicationEntry>(
            r#"
            INSERT INTO applications (job_id, resume_path, resume_pool_id, uploaded_by_user_id, original_filename)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, job_id, resume_path, resume_pool_id, uploaded_by_user_id, original_filename, created_at
            "#,
        )
        .bind(data.job_id)
        .bind(&data.resume_path)
        .bind(data.resume_pool_id)
        .bind(&data.uploaded_by_user_id)
        .bind(&data.original_filename)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }
}
