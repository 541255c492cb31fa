use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Durable application row linking a job, a stored resume (path or pool
/// reference) and upload provenance.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationEntry {
    pub id: i32,
    pub job_id: i32,
    pub resume_path: Option<String>,
    pub resume_pool_id: Option<i32>,
    pub uploaded_by_user_id: String,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
}
