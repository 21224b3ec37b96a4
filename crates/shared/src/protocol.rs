use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{DocumentId, DocumentStatus};

/// Treats an explicit JSON `null` the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPayload {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclassifyRequest {
    pub new_type: String,
}

/// Server-side document row as exposed by the listing and reclassify endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub classification_method: Option<String>,
    #[serde(default)]
    pub routed_to: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub manually_reclassified: Option<bool>,
    #[serde(default)]
    pub email_sender: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReclassifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSample {
    #[serde(default)]
    pub sample_text: String,
    #[serde(default)]
    pub classification_result: ClassificationPayload,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineDemoResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub pipeline_stages: Vec<String>,
    #[serde(default)]
    pub pipeline_demo: BTreeMap<String, PipelineSample>,
}

/// Aggregate counts shared by `/api/stats` and `/api/dashboard_stats`; the
/// latter omits the average and the distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_documents: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed_documents: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processing_documents: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_documents: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub type_distribution: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    #[serde(default)]
    pub avg_processing_time: f64,
    #[serde(default)]
    pub ocr_success_rate: f64,
    #[serde(default)]
    pub classification_accuracy: f64,
    #[serde(default)]
    pub completed_docs: u64,
    #[serde(default)]
    pub high_confidence: u64,
    #[serde(default)]
    pub email_configured: bool,
    #[serde(default)]
    pub ml_model_trained: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingTrends {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub counts: Vec<u64>,
}

impl ProcessingTrends {
    /// `(date, count)` pairs; unmatched trailing entries are dropped.
    pub fn points(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.dates
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

/// Series behind the analytics page, from `/api/analytics/charts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsCharts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub type_distribution: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processing_trends: ProcessingTrends,
    #[serde(default, deserialize_with = "null_as_default")]
    pub routing_distribution: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub classification_methods: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accuracy_scores: Vec<f64>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
