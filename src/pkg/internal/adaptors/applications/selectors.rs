use sqlx::PgPool;

use crate::pkg::internal::adaptors::applications::spec::ApplicationEntry;
use crate::prelude::Result;

pub struct ApplicationSelector<'a> {
    pool: &'a PgPool,
}

impl<'a> ApplicationSelector<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        ApplicationSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<ApplicationEntry>> {
        let row = sqlx::query_as::<_, ApplicationEntry>(
            "SELECT id, job_id, resume_path, resume_pool_id, uploaded_by_user_id, original_filename, created_at
             FROM applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_job(&mut self, job_id: i32) -> Result<Vec<ApplicationEntry>> {
        let rows = sqlx::query_as::<_, ApplicationEntry>(
            "SELECT id, job_id, resume_path, resume_pool_id, uploaded_by_user_id, original_filename, created_at
             FROM applications WHERE job_id = $1 ORDER BY created_at DESC",
        )
        .bind(job_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
