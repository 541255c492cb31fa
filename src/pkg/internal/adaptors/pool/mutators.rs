use sqlx::PgPool;

use crate::pkg::internal::adaptors::pool::spec::PoolEntry;
use crate::prelude::Result;

pub struct PoolMutator<'a> {
    pool: &'a PgPool,
}

impl<'a> PoolMutator<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        PoolMutator { pool }
    }

    pub async fn create(
        &mut self,
        company_id: &str,
        file_path: &str,
        filename: &str,
    ) -> Result<PoolEntry> {
        let row = sqlx::query_as::<_, PoolEntry>(
            r#"
            INSERT INTO resume_pool (company_id, file_path, filename)
            VALUES ($1, $2, $3)
            RETURNING id, company_id, file_path, filename, uploaded_at
            "#,
        )
        .bind(company_id)
        .bind(file_path)
        .bind(filename)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }
}
