use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::DocumentId,
    error::ApiErrorBody,
    protocol::{
        ActivityEntry, AnalyticsCharts, ChatRequest, ChatResponse, DocumentRecord,
        PerformanceMetrics, PipelineDemoResponse, ProcessResponse, ReclassifyRequest,
        ReclassifyResponse, StatsResponse, UploadResponse,
    },
};
use tracing::{debug, info};
use url::Url;

pub mod chat;
pub mod dashboard;
pub mod error;
pub mod pipeline;
pub mod validation;
pub mod view;
pub mod workflow;

pub use chat::{ChatWidget, KeyPress, CHAT_FAILURE_REPLY};
pub use dashboard::{routing_summary, DashboardStatsViewer};
pub use error::ClientError;
pub use pipeline::PipelineDemoViewer;
pub use validation::{validate_selection, FileSelection, SelectionSource};
pub use workflow::{UploadWorkflowController, WorkflowState};

/// Every backend call the controllers make. `DocuflowClient` is the HTTP
/// implementation; tests substitute recording fakes.
#[async_trait]
pub trait DocuflowApi: Send + Sync {
    async fn upload(&self, selection: &FileSelection) -> Result<DocumentId, ClientError>;
    async fn process(&self, document_id: &DocumentId) -> Result<ProcessResponse, ClientError>;
    async fn reclassify(
        &self,
        document_id: &DocumentId,
        new_type: &str,
    ) -> Result<ReclassifyResponse, ClientError>;
    async fn pipeline_demo(&self) -> Result<PipelineDemoResponse, ClientError>;
    async fn stats(&self) -> Result<StatsResponse, ClientError>;
    async fn dashboard_stats(&self) -> Result<StatsResponse, ClientError>;
    async fn chat(&self, message: &str) -> Result<String, ClientError>;
    async fn documents(&self) -> Result<Vec<DocumentRecord>, ClientError>;
    async fn performance(&self) -> Result<PerformanceMetrics, ClientError>;
    async fn activity(&self) -> Result<Vec<ActivityEntry>, ClientError>;
    async fn analytics_charts(&self) -> Result<AnalyticsCharts, ClientError>;
}

#[derive(Debug, Clone)]
pub struct DocuflowClient {
    http: Client,
    base: Url,
    server_url: String,
}

impl DocuflowClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(server_url, None)
    }

    pub fn with_timeout(server_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let parsed = Url::parse(server_url.trim())?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::UnsupportedUrl(parsed.to_string()));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
            base: parsed,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    /// `{base}/{action}/{id}` with the id percent-encoded as a single path
    /// segment, so reserved characters never change the route.
    fn document_endpoint(
        &self,
        action: &str,
        document_id: &DocumentId,
    ) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::UnsupportedUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(action)
            .push(document_id.as_str());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!(path, "GET");
        let response = self.http.get(self.endpoint(path)).send().await?;
        read_json(response).await
    }
}

/// Decodes a response body, turning non-2xx statuses into `ClientError::Server`
/// carrying the server's `error` text when it sent one.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiErrorBody>(&body)
            .ok()
            .and_then(|envelope| envelope.message().map(str::to_string));
        return Err(ClientError::Server {
            status: Some(status.as_u16()),
            message,
        });
    }
    Ok(serde_json::from_slice(&body)?)
}

fn rejected(message: Option<String>) -> ClientError {
    ClientError::Server {
        status: None,
        message,
    }
}

#[async_trait]
impl DocuflowApi for DocuflowClient {
    async fn upload(&self, selection: &FileSelection) -> Result<DocumentId, ClientError> {
        let part = multipart::Part::bytes(selection.bytes.clone())
            .file_name(selection.file_name.clone())
            .mime_str(&selection.effective_mime_type())?;
        let form = multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = read_json(response).await?;
        if !body.success {
            return Err(rejected(body.error));
        }
        let document_id = body.document_id.ok_or(ClientError::MissingField("document_id"))?;
        info!(
            document_id = %document_id,
            file_name = %selection.file_name,
            "upload accepted"
        );
        Ok(document_id)
    }

    async fn process(&self, document_id: &DocumentId) -> Result<ProcessResponse, ClientError> {
        let response = self
            .http
            .post(self.document_endpoint("process", document_id)?)
            .send()
            .await?;
        let body: ProcessResponse = read_json(response).await?;
        if !body.success {
            return Err(rejected(body.error));
        }
        Ok(body)
    }

    async fn reclassify(
        &self,
        document_id: &DocumentId,
        new_type: &str,
    ) -> Result<ReclassifyResponse, ClientError> {
        let response = self
            .http
            .post(self.document_endpoint("reclassify", document_id)?)
            .json(&ReclassifyRequest {
                new_type: new_type.to_string(),
            })
            .send()
            .await?;
        let body: ReclassifyResponse = read_json(response).await?;
        if !body.success {
            return Err(rejected(body.error));
        }
        Ok(body)
    }

    async fn pipeline_demo(&self) -> Result<PipelineDemoResponse, ClientError> {
        let body: PipelineDemoResponse = self.get_json("/api/pipeline-demo").await?;
        if !body.success {
            return Err(rejected(None));
        }
        Ok(body)
    }

    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        self.get_json("/api/stats").await
    }

    async fn dashboard_stats(&self) -> Result<StatsResponse, ClientError> {
        self.get_json("/api/dashboard_stats").await
    }

    async fn chat(&self, message: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/api/chatbot"))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;
        let body: ChatResponse = read_json(response).await?;
        body.response.ok_or(ClientError::MissingField("response"))
    }

    async fn documents(&self) -> Result<Vec<DocumentRecord>, ClientError> {
        self.get_json("/api/documents").await
    }

    async fn performance(&self) -> Result<PerformanceMetrics, ClientError> {
        self.get_json("/api/analytics/performance").await
    }

    async fn activity(&self) -> Result<Vec<ActivityEntry>, ClientError> {
        self.get_json("/api/analytics/activity").await
    }

    async fn analytics_charts(&self) -> Result<AnalyticsCharts, ClientError> {
        self.get_json("/api/analytics/charts").await
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
