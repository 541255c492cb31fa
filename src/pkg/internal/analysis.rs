use async_trait::async_trait;

use crate::conf::settings;
use crate::pkg::internal::ingest::pipeline::AnalysisSink;
use crate::pkg::internal::ingest::spec::{AnalysisRequest, DispatchError};

/// Hands analysis payloads to the external service over a JSON webhook.
/// Any non-2xx status or transport error is a [`DispatchError`]; nothing
/// stored or persisted before the call is ever rolled back.
#[derive(Debug, Clone)]
pub struct AnalysisDispatcher {
    http: reqwest::Client,
    endpoint: String,
}

impl AnalysisDispatcher {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        AnalysisDispatcher {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_settings() -> Self {
        AnalysisDispatcher::new(reqwest::Client::new(), settings.analysis_webhook_url.clone())
    }
}

#[async_trait]
impl AnalysisSink for AnalysisDispatcher {
    async fn dispatch(&self, request: &AnalysisRequest) -> Result<(), DispatchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| DispatchError(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError(format!(
                "analysis endpoint returned {}",
                status
            )));
        }
        tracing::debug!(
            application_id = request.application_id,
            "analysis dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use chrono::Utc;

    use crate::pkg::internal::ingest::spec::AnalysisRequest;

    #[test]
    fn payload_carries_denormalized_job_fields_and_encoded_resume() {
        let content = b"%PDF-1.4 fake";
        let request = AnalysisRequest {
            application_id: 12,
            resume_content: base64::engine::general_purpose::STANDARD.encode(content),
            filename: "cv.pdf".into(),
            job_id: 3,
            job_title: "Backend Engineer".into(),
            company: "Acme".into(),
            department: "Engineering".into(),
            location: "Remote".into(),
            employment_type: "full-time".into(),
            description: "Build things".into(),
            responsibilities: "Ship".into(),
            requirements: "Rust".into(),
            benefits: "Coffee".into(),
            applied_at: Utc::now(),
            upload_source: "company_upload".into(),
            uploaded_by_company: true,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["application_id"], 12);
        assert_eq!(value["job_id"], 3);
        assert_eq!(value["job_title"], "Backend Engineer");
        assert_eq!(value["upload_source"], "company_upload");
        assert_eq!(value["uploaded_by_company"], true);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(value["resume_content"].as_str().unwrap())
            .unwrap();
        assert_eq!(decoded, content);
    }
}
