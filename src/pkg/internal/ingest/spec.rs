use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Immutable input unit for one batch. Exists only for the duration of a run.
#[derive(Debug, Clone)]
pub struct ResumeItem {
    pub filename: String,
    pub declared_size: usize,
    pub media_type: String,
    pub content: Vec<u8>,
}

/// Reference to a durably stored resume binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRef {
    pub path: String,
}

impl StoredRef {
    pub fn new(path: impl Into<String>) -> Self {
        StoredRef { path: path.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Uploading,
    Processing,
    Completed,
    Failed,
}

/// Which pipeline stage failed. Distinguishes "never stored" (Storage),
/// "orphaned blob, no record" (Persist) and "stored but not analyzed"
/// (Dispatch), which have different recovery actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Storage,
    Persist,
    Dispatch,
}

/// One resume moving through the pipeline. Mutated only by the orchestrator;
/// terminal states are never re-entered or mutated afterward.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineItem {
    pub filename: String,
    pub status: ItemStatus,
    pub progress: u8,
    pub error_message: Option<String>,
    pub application_id: Option<i32>,
    pub failure: Option<FailureKind>,
}

impl PipelineItem {
    pub fn new(filename: impl Into<String>) -> Self {
        PipelineItem {
            filename: filename.into(),
            status: ItemStatus::Pending,
            progress: 0,
            error_message: None,
            application_id: None,
            failure: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, ItemStatus::Completed | ItemStatus::Failed)
    }

    pub(crate) fn advance(&mut self, status: ItemStatus, progress: u8) {
        if self.is_terminal() {
            return;
        }
        self.status = status;
        self.progress = progress;
    }

    pub(crate) fn set_application_id(&mut self, id: i32) {
        if self.is_terminal() {
            return;
        }
        self.application_id = Some(id);
    }

    pub(crate) fn complete(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.status = ItemStatus::Completed;
        self.progress = 100;
    }

    pub(crate) fn fail(&mut self, kind: FailureKind, message: &str) {
        if self.is_terminal() {
            return;
        }
        self.status = ItemStatus::Failed;
        self.error_message = Some(message.to_string());
        self.failure = Some(kind);
    }
}

/// Denormalized job fields carried into every analysis payload.
#[derive(Debug, Clone, Serialize)]
pub struct JobContext {
    pub job_id: i32,
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

/// Transport payload for the external analysis webhook.
#[derive(Debug, Serialize)]
pub struct AnalysisRequest {
    pub application_id: i32,
    /// Base64-encoded resume binary.
    pub resume_content: String,
    pub filename: String,
    pub job_id: i32,
    pub job_title: String,
    pub company: String,
    pub department: String,
    pub location: String,
    pub employment_type: String,
    pub description: String,
    pub responsibilities: String,
    pub requirements: String,
    pub benefits: String,
    pub applied_at: DateTime<Utc>,
    pub upload_source: String,
    pub uploaded_by_company: bool,
}

/// Final per-batch accounting, derived from the items and never stored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub failed_storage: usize,
    pub failed_persist: usize,
    pub failed_dispatch: usize,
}

/// Read-only view published after every item transition.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSnapshot {
    pub items: Vec<PipelineItem>,
    pub aggregate_progress: u8,
}

#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

#[derive(Debug, Error)]
#[error("persist error: {0}")]
pub struct PersistError(pub String);

#[derive(Debug, Error)]
#[error("dispatch error: {0}")]
pub struct DispatchError(pub String);
