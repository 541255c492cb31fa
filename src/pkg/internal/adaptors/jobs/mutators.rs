use sqlx::PgPool;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::pkg::server::handlers::jobs::CreateJobInput;
use crate::prelude::Result;

pub struct JobMutator<'a> {
    pool: &'a PgPool,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, company_id: &str, job: CreateJobInput) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(
            r#"
            INSERT INTO jobs (company_id, title, company, department, location, employment_type, description, responsibilities, requirements, benefits)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, company_id, title, company, department, location, employment_type, description, responsibilities, requirements, benefits, created_at, updated_at
            "#,
        )
        .bind(company_id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.department)
        .bind(&job.location)
        .bind(&job.employment_type)
        .bind(&job.description)
        .bind(&job.responsibilities)
        .bind(&job.requirements)
        .bind(&job.benefits)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }
}
