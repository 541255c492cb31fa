use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::pkg::internal::adaptors::applications::{
    mutators::{ApplicationMutator, CreateApplicationData},
    spec::ApplicationEntry,
};
use crate::pkg::internal::ingest::{pipeline::RecordStore, spec::PersistError};

/// Postgres-backed record store; sole writer of application rows.
pub struct PgRecordStore {
    pool: Arc<PgPool>,
}

impl PgRecordStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        PgRecordStore { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create_application(
        &self,
        data: CreateApplicationData,
    ) -> core::result::Result<ApplicationEntry, PersistError> {
        ApplicationMutator::new(&self.pool)
            .create(data)
            .await
            .map_err(|e| PersistError(e.to_string()))
    }
}
