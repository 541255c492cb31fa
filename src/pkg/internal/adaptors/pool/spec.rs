use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A previously stored resume available for reprocessing against new jobs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PoolEntry {
    pub id: i32,
    pub company_id: String,
    pub file_path: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}
