use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::pkg::internal::adaptors::pool::{
    mutators::PoolMutator, selectors::PoolSelector, spec::PoolEntry,
};
use crate::pkg::internal::ingest::pipeline::BlobStore;
use crate::pkg::internal::ingest::spec::ResumeItem;
use crate::pkg::internal::ingest::validate::{validate, RejectedFile};
use crate::pkg::server::handlers::applications::collect_resume_fields;
use crate::{
    pkg::{internal::auth::User, server::state::AppState},
    prelude::{AppError, Result},
};

#[derive(Serialize)]
pub struct PoolUploadResponse {
    pub entries: Vec<PoolEntry>,
    pub rejected: Vec<RejectedFile>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Vec<PoolEntry>>> {
    let entries = PoolSelector::new(&state.db_pool)
        .get_for_company(&user.company_id)
        .await?;
    Ok(Json(entries))
}

/// Adds resumes to the company pool: store plus persist, no analysis
/// dispatch. Pool entries are later reprocessed against jobs through the
/// pipeline's pool call site.
pub async fn upload(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    mut multipart: Multipart,
) -> Result<Json<PoolUploadResponse>> {
    let candidates = collect_resume_fields(&mut multipart).await?;
    if candidates.is_empty() {
        return Err(AppError::Validation("no resume files supplied".into()));
    }
    let screened = validate(candidates, 0);

    let mut entries = Vec::new();
    for resume in screened.accepted {
        let path = pool_path(&user.company_id, &resume);
        state
            .blob
            .store(&path, &resume.content, &resume.media_type)
            .await?;
        let entry = PoolMutator::new(&state.db_pool)
            .create(&user.company_id, &path, &resume.filename)
            .await?;
        entries.push(entry);
    }

    Ok(Json(PoolUploadResponse {
        entries,
        rejected: screened.rejected,
    }))
}

fn pool_path(company_id: &str, resume: &ResumeItem) -> String {
    format!("pool/{}/{}_{}", company_id, Uuid::new_v4(), resume.filename)
}
