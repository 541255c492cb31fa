use sqlx::PgPool;

use crate::pkg::internal::adaptors::pool::spec::PoolEntry;
use crate::prelude::Result;

pub struct PoolSelector<'a> {
    pool: &'a PgPool,
}

impl<'a> PoolSelector<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        PoolSelector { pool }
    }

    pub async fn get_for_company(&mut self, company_id: &str) -> Result<Vec<PoolEntry>> {
        let rows = sqlx::query_as::<_, PoolEntry>(
            "SELECT id, company_id, file_path, filename, uploaded_at
             FROM resume_pool WHERE company_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_ids(&mut self, company_id: &str, ids: &[i32]) -> Result<Vec<PoolEntry>> {
        let rows = sqlx::query_as::<_, PoolEntry>(
            "SELECT id, company_id, file_path, filename, uploaded_at
             FROM resume_pool WHERE company_id = $1 AND id = ANY($2)",
        )
        .bind(company_id)
        .bind(ids)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
