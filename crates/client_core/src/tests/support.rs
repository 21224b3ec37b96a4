//! Recording doubles shared by the controller tests.

use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::{DocumentId, Section},
    protocol::{
        ActivityEntry, AnalyticsCharts, ClassificationPayload, DocumentRecord, PerformanceMetrics,
        PipelineDemoResponse, ProcessResponse, ReclassifyResponse, RoutingPayload, StatsResponse,
    },
};

use crate::{
    error::ClientError,
    validation::FileSelection,
    view::{
        Banner, ChartRenderer, ChartSpec, ChatEntry, ChatView, ClassificationDisplay,
        DashboardCounts, DashboardView, PipelineSampleDisplay, PipelineView, RoutingSummaryRow,
        WorkflowView,
    },
    DocuflowApi,
};

#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail(Option<String>),
}

impl<T: Clone> Reply<T> {
    fn into_result(self) -> Result<T, ClientError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Fail(message) => Err(ClientError::Server {
                status: Some(500),
                message,
            }),
        }
    }
}

pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    uploads: Mutex<VecDeque<Reply<DocumentId>>>,
    process: Mutex<Reply<ProcessResponse>>,
    reclassify: Mutex<Reply<ReclassifyResponse>>,
    stats: Mutex<VecDeque<Reply<StatsResponse>>>,
    pipeline: Mutex<Reply<PipelineDemoResponse>>,
    chat: Mutex<Reply<String>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(VecDeque::new()),
            process: Mutex::new(Reply::Fail(None)),
            reclassify: Mutex::new(Reply::Fail(None)),
            stats: Mutex::new(VecDeque::new()),
            pipeline: Mutex::new(Reply::Fail(None)),
            chat: Mutex::new(Reply::Fail(None)),
        }
    }
}

impl FakeApi {
    pub fn with_upload(self, reply: Reply<DocumentId>) -> Self {
        self.uploads.lock().expect("lock").push_back(reply);
        self
    }

    pub fn with_process(self, reply: Reply<ProcessResponse>) -> Self {
        *self.process.lock().expect("lock") = reply;
        self
    }

    pub fn with_reclassify(self, reply: Reply<ReclassifyResponse>) -> Self {
        *self.reclassify.lock().expect("lock") = reply;
        self
    }

    pub fn with_stats(self, reply: Reply<StatsResponse>) -> Self {
        self.stats.lock().expect("lock").push_back(reply);
        self
    }

    pub fn with_pipeline(self, reply: Reply<PipelineDemoResponse>) -> Self {
        *self.pipeline.lock().expect("lock") = reply;
        self
    }

    pub fn with_chat(self, reply: Reply<String>) -> Self {
        *self.chat.lock().expect("lock") = reply;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }
}

#[async_trait]
impl DocuflowApi for FakeApi {
    async fn upload(&self, selection: &FileSelection) -> Result<DocumentId, ClientError> {
        self.record(format!("POST /upload {}", selection.file_name));
        self.uploads
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Reply::Fail(None))
            .into_result()
    }

    async fn process(&self, document_id: &DocumentId) -> Result<ProcessResponse, ClientError> {
        self.record(format!("POST /process/{document_id}"));
        self.process.lock().expect("lock").clone().into_result()
    }

    async fn reclassify(
        &self,
        document_id: &DocumentId,
        new_type: &str,
    ) -> Result<ReclassifyResponse, ClientError> {
        self.record(format!("POST /reclassify/{document_id} {new_type}"));
        self.reclassify.lock().expect("lock").clone().into_result()
    }

    async fn pipeline_demo(&self) -> Result<PipelineDemoResponse, ClientError> {
        self.record("GET /api/pipeline-demo".to_string());
        self.pipeline.lock().expect("lock").clone().into_result()
    }

    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        self.record("GET /api/stats".to_string());
        self.stats
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Reply::Fail(None))
            .into_result()
    }

    async fn dashboard_stats(&self) -> Result<StatsResponse, ClientError> {
        self.record("GET /api/dashboard_stats".to_string());
        self.stats
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Reply::Fail(None))
            .into_result()
    }

    async fn chat(&self, message: &str) -> Result<String, ClientError> {
        self.record(format!("POST /api/chatbot {message}"));
        self.chat.lock().expect("lock").clone().into_result()
    }

    async fn documents(&self) -> Result<Vec<DocumentRecord>, ClientError> {
        self.record("GET /api/documents".to_string());
        Ok(Vec::new())
    }

    async fn performance(&self) -> Result<PerformanceMetrics, ClientError> {
        self.record("GET /api/analytics/performance".to_string());
        Ok(PerformanceMetrics::default())
    }

    async fn activity(&self) -> Result<Vec<ActivityEntry>, ClientError> {
        self.record("GET /api/analytics/activity".to_string());
        Ok(Vec::new())
    }

    async fn analytics_charts(&self) -> Result<AnalyticsCharts, ClientError> {
        self.record("GET /api/analytics/charts".to_string());
        Ok(AnalyticsCharts::default())
    }
}

pub fn classified(doc_type: &str, confidence: f64, department: &str) -> ProcessResponse {
    ProcessResponse {
        success: true,
        document_id: None,
        filename: None,
        extracted_text: Some("INVOICE #12345 total due".to_string()),
        classification: Some(ClassificationPayload {
            doc_type: Some(doc_type.to_string()),
            confidence: Some(confidence),
            method: Some("hybrid".to_string()),
        }),
        routing: Some(RoutingPayload {
            department: Some(department.to_string()),
            path: None,
        }),
        error: None,
    }
}

pub fn pdf(name: &str) -> FileSelection {
    FileSelection::new(name, Some("application/pdf".to_string()), b"%PDF-1.7".to_vec())
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Section(Section),
    Progress(u8, String),
    Results(ClassificationDisplay),
    Updated(ClassificationDisplay),
    Error(String),
    Banner(Banner),
    ClearedInput,
    Counts(DashboardCounts),
    Routing(Vec<RoutingSummaryRow>),
    Stages(Vec<String>),
    Sample(PipelineSampleDisplay),
    Chat(ChatEntry),
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn sections(&self) -> Vec<Section> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Section(section) => Some(*section),
                _ => None,
            })
            .collect()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            ViewEvent::Error(message) => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn banners(&self) -> Vec<&Banner> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Banner(banner) => Some(banner),
                _ => None,
            })
            .collect()
    }
}

impl WorkflowView for RecordingView {
    fn show_section(&mut self, section: Section) {
        self.events.push(ViewEvent::Section(section));
    }

    fn show_progress(&mut self, percent: u8, message: &str) {
        self.events
            .push(ViewEvent::Progress(percent, message.to_string()));
    }

    fn show_results(&mut self, results: &ClassificationDisplay) {
        self.events.push(ViewEvent::Results(results.clone()));
    }

    fn update_classification(&mut self, results: &ClassificationDisplay) {
        self.events.push(ViewEvent::Updated(results.clone()));
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(ViewEvent::Error(message.to_string()));
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.events.push(ViewEvent::Banner(banner.clone()));
    }

    fn clear_file_input(&mut self) {
        self.events.push(ViewEvent::ClearedInput);
    }
}

impl DashboardView for RecordingView {
    fn show_counts(&mut self, counts: &DashboardCounts) {
        self.events.push(ViewEvent::Counts(*counts));
    }

    fn show_routing_summary(&mut self, rows: &[RoutingSummaryRow]) {
        self.events.push(ViewEvent::Routing(rows.to_vec()));
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.events.push(ViewEvent::Banner(banner.clone()));
    }
}

impl PipelineView for RecordingView {
    fn show_stages(&mut self, stages: &[String]) {
        self.events.push(ViewEvent::Stages(stages.to_vec()));
    }

    fn show_sample(&mut self, sample: &PipelineSampleDisplay) {
        self.events.push(ViewEvent::Sample(sample.clone()));
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.events.push(ViewEvent::Banner(banner.clone()));
    }
}

impl ChatView for RecordingView {
    fn append(&mut self, entry: &ChatEntry) {
        self.events.push(ViewEvent::Chat(entry.clone()));
    }
}

#[derive(Default)]
pub struct ChartLog {
    pub created: usize,
    pub destroyed: usize,
    pub live: HashSet<u32>,
    pub last_spec: Option<ChartSpec>,
}

/// Chart renderer that tracks which handles are still alive.
#[derive(Clone, Default)]
pub struct RecordingCharts {
    pub log: Arc<Mutex<ChartLog>>,
    next_handle: u32,
}

impl ChartRenderer for RecordingCharts {
    type Handle = u32;

    fn create(&mut self, spec: &ChartSpec) -> u32 {
        self.next_handle += 1;
        let mut log = self.log.lock().expect("lock");
        log.created += 1;
        log.live.insert(self.next_handle);
        log.last_spec = Some(spec.clone());
        self.next_handle
    }

    fn destroy(&mut self, handle: u32) {
        let mut log = self.log.lock().expect("lock");
        log.destroyed += 1;
        assert!(log.live.remove(&handle), "destroyed unknown chart {handle}");
    }
}
