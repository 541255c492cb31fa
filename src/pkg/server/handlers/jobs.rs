use std::sync::Arc;

use axum::{
    extract::{Path as AxumPath, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{mutators::JobMutator, selectors::JobSelector, spec::JobEntry},
            auth::User,
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

#[derive(Deserialize)]
pub struct CreateJobInput {
    pub title: String,
    pub company: String,
    pub department: String,
    pub location: String,
    pub employment_type: String,
    pub description: String,
    pub responsibilities: String,
    pub requirements: String,
    pub benefits: String,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Json(input): Json<CreateJobInput>,
) -> Result<Json<JobEntry>> {
    let job = JobMutator::new(&state.db_pool)
        .create(&user.company_id, input)
        .await?;
    tracing::info!(job_id = job.id, "job created");
    Ok(Json(job))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Vec<JobEntry>>> {
    let jobs = JobSelector::new(&state.db_pool)
        .get_for_company(&user.company_id)
        .await?;
    Ok(Json(jobs))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    AxumPath(job_id): AxumPath<i32>,
) -> Result<Json<JobEntry>> {
    let job = JobSelector::new(&state.db_pool)
        .get_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))?;
    if job.company_id != user.company_id {
        return Err(AppError::Forbidden);
    }
    Ok(Json(job))
}
