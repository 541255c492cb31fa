use std::sync::Arc;

use axum::{
    extract::{Multipart, Path as AxumPath, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::conf::settings;
use crate::pkg::internal::adaptors::applications::{
    selectors::ApplicationSelector, spec::ApplicationEntry,
};
use crate::pkg::internal::adaptors::jobs::{selectors::JobSelector, spec::JobEntry};
use crate::pkg::internal::adaptors::pool::selectors::PoolSelector;
use crate::pkg::internal::ingest::pipeline::{
    BatchContext, BatchOrchestrator, BlobStore, ResumeSource,
};
use crate::pkg::internal::ingest::spec::{BatchSummary, PipelineItem, ResumeItem, StoredRef};
use crate::pkg::internal::ingest::validate::{validate, RejectedFile, MAX_BATCH_ITEMS};
use crate::pkg::internal::records::PgRecordStore;
use crate::{
    pkg::{internal::auth::User, server::state::AppState},
    prelude::{AppError, Result},
};

#[derive(Serialize)]
pub struct BatchResponse {
    pub summary: BatchSummary,
    pub items: Vec<PipelineItem>,
    pub rejected: Vec<RejectedFile>,
}

#[derive(Deserialize)]
pub struct PoolSelectionInput {
    pub pool_ids: Vec<i32>,
}

async fn load_job_for(state: &AppState, user: &User, job_id: i32) -> Result<JobEntry> {
    let job = JobSelector::new(&state.db_pool)
        .get_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))?;
    if job.company_id != user.company_id {
        return Err(AppError::Forbidden);
    }
    Ok(job)
}

pub(crate) async fn collect_resume_fields(multipart: &mut Multipart) -> Result<Vec<ResumeItem>> {
    let mut candidates = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "resumes" {
            let _ = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("malformed multipart field: {e}")))?;
            continue;
        }
        let filename = field.file_name().unwrap_or("unknown").to_string();
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed reading {filename}: {e}")))?;
        candidates.push(ResumeItem {
            filename,
            declared_size: data.len(),
            media_type,
            content: data.into(),
        });
    }
    Ok(candidates)
}

/// Bulk upload call site: fresh binaries enter the pipeline through the blob
/// store's `store` step.
pub async fn bulk_upload(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    AxumPath(job_id): AxumPath<i32>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>> {
    let candidates = collect_resume_fields(&mut multipart).await?;
    if candidates.is_empty() {
        return Err(AppError::Validation("no resume files supplied".into()));
    }
    let job = load_job_for(&state, &user, job_id).await?;

    let screened = validate(candidates, 0);
    if screened.accepted.is_empty() {
        return Ok(Json(BatchResponse {
            summary: BatchSummary::default(),
            items: Vec::new(),
            rejected: screened.rejected,
        }));
    }

    let records = PgRecordStore::new(state.db_pool.clone());
    let ctx = BatchContext {
        job: job.context(),
        company_id: user.company_id.clone(),
        uploader_id: user.user_id.clone(),
        upload_source: "company_upload".into(),
        uploaded_by_company: true,
    };
    let sources = screened
        .accepted
        .into_iter()
        .map(ResumeSource::Upload)
        .collect();
    let outcome = BatchOrchestrator::new(&*state.blob, &records, &*state.analysis, ctx)
        .run(sources)
        .await;

    Ok(Json(BatchResponse {
        summary: outcome.summary,
        items: outcome.items,
        rejected: screened.rejected,
    }))
}

/// Pool reprocessing call site: binaries are re-fetched from storage and the
/// created records link the pool reference. Same machine, same failure
/// policy; only the acquisition step differs.
pub async fn reprocess_pool(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    AxumPath(job_id): AxumPath<i32>,
    Json(input): Json<PoolSelectionInput>,
) -> Result<Json<BatchResponse>> {
    if input.pool_ids.is_empty() {
        return Err(AppError::Validation("no pool entries selected".into()));
    }
    if input.pool_ids.len() > MAX_BATCH_ITEMS {
        return Err(AppError::Validation("batch limit exceeded".into()));
    }
    let job = load_job_for(&state, &user, job_id).await?;

    let entries = PoolSelector::new(&state.db_pool)
        .get_by_ids(&user.company_id, &input.pool_ids)
        .await?;
    if entries.len() != input.pool_ids.len() {
        return Err(AppError::NotFound("one or more pool entries not found".into()));
    }

    let records = PgRecordStore::new(state.db_pool.clone());
    let ctx = BatchContext {
        job: job.context(),
        company_id: user.company_id.clone(),
        uploader_id: user.user_id.clone(),
        upload_source: "resume_pool".into(),
        uploaded_by_company: true,
    };
    let sources = entries
        .into_iter()
        .map(|entry| ResumeSource::Pool {
            pool_id: entry.id,
            stored: StoredRef::new(entry.file_path),
            filename: entry.filename,
        })
        .collect();
    let outcome = BatchOrchestrator::new(&*state.blob, &records, &*state.analysis, ctx)
        .run(sources)
        .await;

    Ok(Json(BatchResponse {
        summary: outcome.summary,
        items: outcome.items,
        rejected: Vec::new(),
    }))
}

pub async fn list_for_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    AxumPath(job_id): AxumPath<i32>,
) -> Result<Json<Vec<ApplicationEntry>>> {
    load_job_for(&state, &user, job_id).await?;
    let applications = ApplicationSelector::new(&state.db_pool)
        .get_by_job(job_id)
        .await?;
    Ok(Json(applications))
}

pub async fn resume_url(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    AxumPath(application_id): AxumPath<i32>,
) -> Result<Json<Value>> {
    let application = ApplicationSelector::new(&state.db_pool)
        .get_by_id(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("application {application_id}")))?;
    load_job_for(&state, &user, application.job_id).await?;

    let path = match (&application.resume_path, application.resume_pool_id) {
        (Some(path), _) => path.clone(),
        (None, Some(pool_id)) => PoolSelector::new(&state.db_pool)
            .get_by_ids(&user.company_id, &[pool_id])
            .await?
            .into_iter()
            .next()
            .map(|entry| entry.file_path)
            .ok_or_else(|| AppError::NotFound(format!("pool entry {pool_id}")))?,
        (None, None) => {
            return Err(AppError::Internal(
                "application has no resume reference".into(),
            ))
        }
    };

    let ttl = settings.signed_url_ttl_secs;
    let url = state
        .blob
        .issue_retrieval_url(&StoredRef::new(path), ttl)
        .await?;
    Ok(Json(json!({ "url": url, "expires_in": ttl })))
}
