use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pkg::internal::ingest::spec::JobContext;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobEntry {
    pub id: i32,
    pub company_id: String,
    pub title: String,
    pub company: String,
    pub department: String,
    pub location: String,
    pub employment_type: String,
    pub description: String,
    pub responsibilities: String,
    pub requirements: String,
    pub benefits: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobEntry {
    /// Denormalized view carried into every analysis payload.
    pub fn context(&self) -> JobContext {
        JobContext {
            job_id: self.id,
            title: self.title.clone(),
            company: self.company.clone(),
            department: self.department.clone(),
            location: self.location.clone(),
            employment_type: self.employment_type.clone(),
            description: self.description.clone(),
            responsibilities: self.responsibilities.clone(),
            requirements: self.requirements.clone(),
            benefits: self.benefits.clone(),
        }
    }
}
