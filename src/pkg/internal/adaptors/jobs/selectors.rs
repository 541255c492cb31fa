use sqlx::PgPool;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::prelude::Result;

pub struct JobSelector<'a> {
    pool: &'a PgPool,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(
            "SELECT id, company_id, title, company, department, location, employment_type, description, responsibilities, requirements, benefits, created_at, updated_at
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_for_company(&mut self, company_id: &str) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(
            "SELECT id, company_id, title, company, department, location, employment_type, description, responsibilities, requirements, benefits, created_at, updated_at
             FROM jobs WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
