use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use tokio::sync::mpsc;

use crate::pkg::internal::adaptors::applications::{
    mutators::CreateApplicationData, spec::ApplicationEntry,
};
use crate::pkg::internal::ingest::spec::{
    AnalysisRequest, BatchSnapshot, BatchSummary, DispatchError, FailureKind, ItemStatus,
    JobContext, PersistError, PipelineItem, ResumeItem, StorageError, StoredRef,
};

/// Durable, path-addressed storage for resume binaries.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores bytes at `path`. Overwrite is disabled; a path collision is a
    /// [`StorageError`].
    async fn store(
        &self,
        path: &str,
        bytes: &[u8],
        media_type: &str,
    ) -> Result<StoredRef, StorageError>;

    async fn fetch(&self, stored: &StoredRef) -> Result<Vec<u8>, StorageError>;

    /// Issues a short-lived signed retrieval URL for a stored object.
    async fn issue_retrieval_url(
        &self,
        stored: &StoredRef,
        ttl_secs: u64,
    ) -> Result<String, StorageError>;
}

/// Sole writer of application records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_application(
        &self,
        data: CreateApplicationData,
    ) -> Result<ApplicationEntry, PersistError>;
}

/// Hand-off to the external analysis service. Best-effort: a failure here
/// never rolls back the stored blob or the created record.
#[async_trait]
pub trait AnalysisSink: Send + Sync {
    async fn dispatch(&self, request: &AnalysisRequest) -> Result<(), DispatchError>;
}

/// Where an item's binary comes from. Fresh uploads store new bytes; pool
/// entries re-fetch an already-stored resume and link the pool reference on
/// the created record. Everything else about the pipeline is identical.
pub enum ResumeSource {
    Upload(ResumeItem),
    Pool {
        pool_id: i32,
        stored: StoredRef,
        filename: String,
    },
}

impl ResumeSource {
    pub fn filename(&self) -> &str {
        match self {
            ResumeSource::Upload(resume) => &resume.filename,
            ResumeSource::Pool { filename, .. } => filename,
        }
    }
}

/// Per-batch provenance shared by every item.
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub job: JobContext,
    pub company_id: String,
    pub uploader_id: String,
    pub upload_source: String,
    pub uploaded_by_company: bool,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub items: Vec<PipelineItem>,
    pub summary: BatchSummary,
}

pub fn object_path(company_id: &str, job_id: i32, filename: &str) -> String {
    format!(
        "{}/{}/{}_{}",
        company_id,
        job_id,
        Utc::now().timestamp_millis(),
        filename
    )
}

/// Drives each selected resume through store, persist and dispatch, strictly
/// one item at a time. The orchestrator exclusively owns its item list and
/// publishes read-only snapshots after every transition; a dropped receiver
/// never interrupts in-flight work.
pub struct BatchOrchestrator<'a> {
    blob: &'a dyn BlobStore,
    records: &'a dyn RecordStore,
    analysis: &'a dyn AnalysisSink,
    ctx: BatchContext,
    items: Vec<PipelineItem>,
    aggregate: u8,
    progress: Option<mpsc::UnboundedSender<BatchSnapshot>>,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(
        blob: &'a dyn BlobStore,
        records: &'a dyn RecordStore,
        analysis: &'a dyn AnalysisSink,
        ctx: BatchContext,
    ) -> Self {
        BatchOrchestrator {
            blob,
            records,
            analysis,
            ctx,
            items: Vec::new(),
            aggregate: 0,
            progress: None,
        }
    }

    /// Attaches a snapshot channel. Every state transition publishes the full
    /// item list plus the aggregate percentage.
    pub fn with_progress(mut self, sender: mpsc::UnboundedSender<BatchSnapshot>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub async fn run(mut self, sources: Vec<ResumeSource>) -> BatchOutcome {
        self.items = sources
            .iter()
            .map(|source| PipelineItem::new(source.filename()))
            .collect();
        let total = self.items.len();
        self.publish();

        for (idx, source) in sources.into_iter().enumerate() {
            self.process_item(idx, source).await;
            self.aggregate = aggregate_progress(&self.items);
            self.publish();
        }

        let summary = summarize(&self.items);
        tracing::info!(
            total,
            completed = summary.completed,
            failed = summary.failed,
            job_id = self.ctx.job.job_id,
            "batch finished"
        );
        BatchOutcome {
            items: self.items,
            summary,
        }
    }

    async fn process_item(&mut self, idx: usize, source: ResumeSource) {
        self.items[idx].advance(ItemStatus::Uploading, 30);
        self.publish();

        let acquired = match source {
            ResumeSource::Upload(resume) => {
                let path = object_path(&self.ctx.company_id, self.ctx.job.job_id, &resume.filename);
                self.blob
                    .store(&path, &resume.content, &resume.media_type)
                    .await
                    .map(|stored| (resume.content, Some(stored.path), None, resume.filename))
            }
            ResumeSource::Pool {
                pool_id,
                stored,
                filename,
            } => self
                .blob
                .fetch(&stored)
                .await
                .map(|bytes| (bytes, None, Some(pool_id), filename)),
        };
        let (content, resume_path, resume_pool_id, filename) = match acquired {
            Ok(acquired) => acquired,
            Err(err) => {
                tracing::warn!("storage step failed for {}: {}", self.items[idx].filename, err);
                self.items[idx].fail(FailureKind::Storage, "storage failed");
                return;
            }
        };

        self.items[idx].advance(ItemStatus::Processing, 50);
        self.publish();

        let record = match self
            .records
            .create_application(CreateApplicationData {
                job_id: self.ctx.job.job_id,
                resume_path,
                resume_pool_id,
                uploaded_by_user_id: self.ctx.uploader_id.clone(),
                original_filename: filename.clone(),
            })
            .await
        {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("persist step failed for {}: {}", &filename, err);
                self.items[idx].fail(FailureKind::Persist, "persist failed");
                return;
            }
        };
        self.items[idx].set_application_id(record.id);
        self.items[idx].advance(ItemStatus::Processing, 70);
        self.publish();

        let request = self.analysis_request(&record, &content, filename);
        match self.analysis.dispatch(&request).await {
            Ok(()) => self.items[idx].complete(),
            Err(err) => {
                // The record exists; the item is "stored, not yet analyzed".
                tracing::warn!(
                    application_id = record.id,
                    "dispatch step failed for {}: {}",
                    self.items[idx].filename,
                    err
                );
                self.items[idx].fail(FailureKind::Dispatch, "analysis dispatch failed");
            }
        }
    }

    fn analysis_request(
        &self,
        record: &ApplicationEntry,
        content: &[u8],
        filename: String,
    ) -> AnalysisRequest {
        let job = &self.ctx.job;
        AnalysisRequest {
            application_id: record.id,
            resume_content: base64::engine::general_purpose::STANDARD.encode(content),
            filename,
            job_id: job.job_id,
            job_title: job.title.clone(),
            company: job.company.clone(),
            department: job.department.clone(),
            location: job.location.clone(),
            employment_type: job.employment_type.clone(),
            description: job.description.clone(),
            responsibilities: job.responsibilities.clone(),
            requirements: job.requirements.clone(),
            benefits: job.benefits.clone(),
            applied_at: record.created_at,
            upload_source: self.ctx.upload_source.clone(),
            uploaded_by_company: self.ctx.uploaded_by_company,
        }
    }

    fn publish(&self) {
        if let Some(sender) = &self.progress {
            // A closed receiver means the UI surface went away; in-flight
            // work continues regardless.
            let _ = sender.send(BatchSnapshot {
                items: self.items.clone(),
                aggregate_progress: self.aggregate,
            });
        }
    }
}

fn aggregate_progress(items: &[PipelineItem]) -> u8 {
    if items.is_empty() {
        return 0;
    }
    let terminal = items.iter().filter(|item| item.is_terminal()).count();
    ((terminal as f64 / items.len() as f64) * 100.0).round() as u8
}

fn summarize(items: &[PipelineItem]) -> BatchSummary {
    let mut summary = BatchSummary {
        total: items.len(),
        ..BatchSummary::default()
    };
    for item in items {
        match item.status {
            ItemStatus::Completed => summary.completed += 1,
            ItemStatus::Failed => {
                summary.failed += 1;
                match item.failure {
                    Some(FailureKind::Storage) => summary.failed_storage += 1,
                    Some(FailureKind::Persist) => summary.failed_persist += 1,
                    Some(FailureKind::Dispatch) => summary.failed_dispatch += 1,
                    None => {}
                }
            }
            _ => {}
        }
    }
    summary
}
