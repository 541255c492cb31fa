use sqlx::PgPool;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::sync::Arc;

use crate::conf::settings;
use crate::pkg::internal::analysis::AnalysisDispatcher;
use crate::pkg::internal::storage::{ensure_bucket, s3_client, S3Store};
use crate::prelude::Result;

pub fn db_pool() -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(&settings.database_url)?;
    Ok(pool)
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    pub blob: Arc<S3Store>,
    pub analysis: Arc<AnalysisDispatcher>,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        let client = s3_client().await;
        ensure_bucket(&client, &settings.s3_bucket_name).await?;
        Ok(AppState {
            db_pool: Arc::new(db_pool()?),
            blob: Arc::new(S3Store::new(client, settings.s3_bucket_name.clone())),
            analysis: Arc::new(AnalysisDispatcher::from_settings()),
        })
    }
}
