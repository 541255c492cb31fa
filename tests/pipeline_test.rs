use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing_test::traced_test;

use hireline::pkg::internal::adaptors::applications::mutators::CreateApplicationData;
use hireline::pkg::internal::adaptors::applications::spec::ApplicationEntry;
use hireline::pkg::internal::ingest::pipeline::{
    AnalysisSink, BatchContext, BatchOrchestrator, BlobStore, RecordStore, ResumeSource,
};
use hireline::pkg::internal::ingest::spec::{
    AnalysisRequest, DispatchError, FailureKind, ItemStatus, JobContext, PersistError, ResumeItem,
    StorageError, StoredRef,
};

type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct MemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_paths_containing: Option<String>,
    log: Option<CallLog>,
}

impl MemoryBlobStore {
    fn preloaded(objects: &[(&str, &[u8])]) -> Self {
        MemoryBlobStore {
            objects: Mutex::new(
                objects
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_vec()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn record(&self, entry: String) {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(entry);
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(
        &self,
        path: &str,
        bytes: &[u8],
        _media_type: &str,
    ) -> Result<StoredRef, StorageError> {
        self.record(format!("store {path}"));
        if let Some(marker) = &self.fail_paths_containing {
            if path.contains(marker.as_str()) {
                return Err(StorageError("simulated outage".into()));
            }
        }
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(path) {
            return Err(StorageError(format!("object already exists at {path}")));
        }
        objects.insert(path.to_string(), bytes.to_vec());
        Ok(StoredRef::new(path))
    }

    async fn fetch(&self, stored: &StoredRef) -> Result<Vec<u8>, StorageError> {
        self.record(format!("fetch {}", stored.path));
        self.objects
            .lock()
            .unwrap()
            .get(&stored.path)
            .cloned()
            .ok_or_else(|| StorageError(format!("no object at {}", stored.path)))
    }

    async fn issue_retrieval_url(
        &self,
        stored: &StoredRef,
        ttl_secs: u64,
    ) -> Result<String, StorageError> {
        Ok(format!("memory://{}?ttl={}", stored.path, ttl_secs))
    }
}

#[derive(Default)]
struct MemoryRecordStore {
    rows: Mutex<Vec<ApplicationEntry>>,
    next_id: AtomicI32,
    fail: bool,
    log: Option<CallLog>,
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_application(
        &self,
        data: CreateApplicationData,
    ) -> Result<ApplicationEntry, PersistError> {
        if let Some(log) = &self.log {
            log.lock()
                .unwrap()
                .push(format!("persist {}", data.original_filename));
        }
        if self.fail {
            return Err(PersistError("simulated insert failure".into()));
        }
        let entry = ApplicationEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            job_id: data.job_id,
            resume_path: data.resume_path,
            resume_pool_id: data.resume_pool_id,
            uploaded_by_user_id: data.uploaded_by_user_id,
            original_filename: data.original_filename,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(entry.clone());
        Ok(entry)
    }
}

#[derive(Default)]
struct MemorySink {
    dispatched: Mutex<Vec<(i32, String, String)>>,
    fail: bool,
    log: Option<CallLog>,
}

#[async_trait]
impl AnalysisSink for MemorySink {
    async fn dispatch(&self, request: &AnalysisRequest) -> Result<(), DispatchError> {
        if let Some(log) = &self.log {
            log.lock()
                .unwrap()
                .push(format!("dispatch {}", request.filename));
        }
        if self.fail {
            return Err(DispatchError("endpoint unreachable".into()));
        }
        self.dispatched.lock().unwrap().push((
            request.application_id,
            request.filename.clone(),
            request.resume_content.clone(),
        ));
        Ok(())
    }
}

fn batch_context() -> BatchContext {
    BatchContext {
        job: JobContext {
            job_id: 7,
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            department: "Engineering".into(),
            location: "Remote".into(),
            employment_type: "full-time".into(),
            description: "Build the platform".into(),
            responsibilities: "Own services end to end".into(),
            requirements: "Rust, Postgres".into(),
            benefits: "Health, PTO".into(),
        },
        company_id: "acme".into(),
        uploader_id: "user-1".into(),
        upload_source: "company_upload".into(),
        uploaded_by_company: true,
    }
}

fn upload(name: &str) -> ResumeSource {
    ResumeSource::Upload(ResumeItem {
        filename: name.to_string(),
        declared_size: 64,
        media_type: "application/pdf".into(),
        content: format!("%PDF {name}").into_bytes(),
    })
}

#[tokio::test]
async fn full_batch_completes_and_aggregate_passes_through_thirds() {
    let blob = MemoryBlobStore::default();
    let records = MemoryRecordStore::default();
    let sink = MemorySink::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let outcome = BatchOrchestrator::new(&blob, &records, &sink, batch_context())
        .with_progress(tx)
        .run(vec![upload("a.pdf"), upload("b.pdf"), upload("c.pdf")])
        .await;

    assert_eq!(outcome.summary.total, 3);
    assert_eq!(outcome.summary.completed, 3);
    assert_eq!(outcome.summary.failed, 0);
    for item in &outcome.items {
        assert_eq!(item.status, ItemStatus::Completed);
        assert_eq!(item.progress, 100);
        assert!(item.application_id.is_some());
        assert!(item.error_message.is_none());
    }

    let mut aggregates = Vec::new();
    while let Ok(snapshot) = rx.try_recv() {
        if aggregates.last() != Some(&snapshot.aggregate_progress) {
            aggregates.push(snapshot.aggregate_progress);
        }
    }
    assert_eq!(aggregates, vec![0, 33, 67, 100]);

    assert_eq!(records.rows.lock().unwrap().len(), 3);
    assert_eq!(sink.dispatched.lock().unwrap().len(), 3);
}

#[traced_test]
#[tokio::test]
async fn storage_outage_fails_only_that_item() {
    let blob = MemoryBlobStore {
        fail_paths_containing: Some("b.pdf".into()),
        ..Default::default()
    };
    let records = MemoryRecordStore::default();
    let sink = MemorySink::default();

    let outcome = BatchOrchestrator::new(&blob, &records, &sink, batch_context())
        .run(vec![upload("a.pdf"), upload("b.pdf"), upload("c.pdf")])
        .await;

    assert_eq!(outcome.summary.completed, 2);
    assert_eq!(outcome.summary.failed, 1);
    assert_eq!(outcome.summary.failed_storage, 1);
    assert_eq!(
        outcome.summary.completed + outcome.summary.failed,
        outcome.summary.total
    );

    let failed = &outcome.items[1];
    assert_eq!(failed.status, ItemStatus::Failed);
    assert_eq!(failed.error_message.as_deref(), Some("storage failed"));
    assert_eq!(failed.failure, Some(FailureKind::Storage));
    assert!(failed.application_id.is_none());

    // nothing was stored or persisted for the failed item
    let rows = records.rows.lock().unwrap();
    assert!(rows.iter().all(|row| row.original_filename != "b.pdf"));
    let objects = blob.objects.lock().unwrap();
    assert!(objects.keys().all(|path| !path.contains("b.pdf")));

    assert!(logs_contain("storage step failed"));
}

#[tokio::test]
async fn unreachable_analysis_endpoint_leaves_records_behind() {
    let blob = MemoryBlobStore::default();
    let records = MemoryRecordStore::default();
    let sink = MemorySink {
        fail: true,
        ..Default::default()
    };

    let outcome = BatchOrchestrator::new(&blob, &records, &sink, batch_context())
        .run(vec![upload("a.pdf"), upload("b.pdf"), upload("c.pdf")])
        .await;

    assert_eq!(outcome.summary.completed, 0);
    assert_eq!(outcome.summary.failed, 3);
    assert_eq!(outcome.summary.failed_dispatch, 3);
    for item in &outcome.items {
        assert_eq!(item.status, ItemStatus::Failed);
        assert_eq!(
            item.error_message.as_deref(),
            Some("analysis dispatch failed")
        );
        assert_eq!(item.failure, Some(FailureKind::Dispatch));
        // stored, not yet analyzed: the application record exists
        assert!(item.application_id.is_some());
    }
    assert_eq!(records.rows.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn persist_failure_never_dispatches() {
    let blob = MemoryBlobStore::default();
    let records = MemoryRecordStore {
        fail: true,
        ..Default::default()
    };
    let sink = MemorySink::default();

    let outcome = BatchOrchestrator::new(&blob, &records, &sink, batch_context())
        .run(vec![upload("a.pdf")])
        .await;

    assert_eq!(outcome.summary.failed, 1);
    assert_eq!(outcome.summary.failed_persist, 1);
    let item = &outcome.items[0];
    assert_eq!(item.error_message.as_deref(), Some("persist failed"));
    assert_eq!(item.failure, Some(FailureKind::Persist));

    assert!(sink.dispatched.lock().unwrap().is_empty());
    // the blob was stored before the persist step failed; it is orphaned
    // but recoverable
    assert_eq!(blob.objects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn items_process_strictly_in_submission_order() {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let blob = MemoryBlobStore {
        log: Some(log.clone()),
        ..Default::default()
    };
    let records = MemoryRecordStore {
        log: Some(log.clone()),
        ..Default::default()
    };
    let sink = MemorySink {
        log: Some(log.clone()),
        ..Default::default()
    };

    let _ = BatchOrchestrator::new(&blob, &records, &sink, batch_context())
        .run(vec![upload("a.pdf"), upload("b.pdf")])
        .await;

    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 6);
    assert!(calls[0..3].iter().all(|c| c.contains("a.pdf")));
    assert!(calls[3..6].iter().all(|c| c.contains("b.pdf")));
}

#[tokio::test]
async fn pool_sources_fetch_stored_bytes_and_link_pool_reference() {
    let stored_bytes = b"%PDF pooled resume";
    let blob = MemoryBlobStore::preloaded(&[("pool/acme/1_vet.pdf", stored_bytes)]);
    let records = MemoryRecordStore::default();
    let sink = MemorySink::default();

    let mut ctx = batch_context();
    ctx.upload_source = "resume_pool".into();
    let outcome = BatchOrchestrator::new(&blob, &records, &sink, ctx)
        .run(vec![ResumeSource::Pool {
            pool_id: 5,
            stored: StoredRef::new("pool/acme/1_vet.pdf"),
            filename: "vet.pdf".into(),
        }])
        .await;

    assert_eq!(outcome.summary.completed, 1);

    let rows = records.rows.lock().unwrap();
    assert_eq!(rows[0].resume_pool_id, Some(5));
    assert_eq!(rows[0].resume_path, None);

    let dispatched = sink.dispatched.lock().unwrap();
    let expected = base64::engine::general_purpose::STANDARD.encode(stored_bytes);
    assert_eq!(dispatched[0].2, expected);

    // reprocessing never re-stores the binary
    assert_eq!(blob.objects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_pool_fetch_is_a_storage_failure() {
    let blob = MemoryBlobStore::default();
    let records = MemoryRecordStore::default();
    let sink = MemorySink::default();

    let outcome = BatchOrchestrator::new(&blob, &records, &sink, batch_context())
        .run(vec![ResumeSource::Pool {
            pool_id: 9,
            stored: StoredRef::new("pool/acme/missing.pdf"),
            filename: "missing.pdf".into(),
        }])
        .await;

    assert_eq!(outcome.summary.failed_storage, 1);
    assert_eq!(
        outcome.items[0].error_message.as_deref(),
        Some("storage failed")
    );
    assert!(records.rows.lock().unwrap().is_empty());
}
