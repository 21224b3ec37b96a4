//! Rendering seams the controllers drive. A front end implements these to put
//! state on screen; the controllers never touch a toolkit directly.

use shared::domain::{ConfidenceBadge, DocumentId, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
    Info,
}

/// Transient, dismissible notice shown over the current section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Info,
            message: message.into(),
        }
    }
}

/// Classification fields after placeholder fallback, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationDisplay {
    pub document_id: DocumentId,
    pub doc_type: String,
    pub confidence: f64,
    pub badge: ConfidenceBadge,
    pub method: String,
    pub department: String,
    pub extracted_text: String,
}

pub trait WorkflowView {
    fn show_section(&mut self, section: Section);
    fn show_progress(&mut self, percent: u8, message: &str);
    fn show_results(&mut self, results: &ClassificationDisplay);
    /// In-place refresh of the result fields after a manual reclassification.
    fn update_classification(&mut self, results: &ClassificationDisplay);
    fn show_error(&mut self, message: &str);
    fn show_banner(&mut self, banner: &Banner);
    fn clear_file_input(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardCounts {
    pub total: u64,
    pub completed: u64,
    pub processing: u64,
    pub error: u64,
    pub average_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingSummaryRow {
    pub department: String,
    pub document_count: u64,
}

pub trait DashboardView {
    fn show_counts(&mut self, counts: &DashboardCounts);
    fn show_routing_summary(&mut self, rows: &[RoutingSummaryRow]);
    fn show_banner(&mut self, banner: &Banner);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Owns chart instances on behalf of the dashboard. Every handle returned by
/// `create` is eventually passed back to `destroy`.
pub trait ChartRenderer {
    type Handle;

    fn create(&mut self, spec: &ChartSpec) -> Self::Handle;
    fn destroy(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
}

pub trait ChatView {
    fn append(&mut self, entry: &ChatEntry);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSampleDisplay {
    pub key: String,
    pub sample_text: String,
    pub doc_type: String,
    pub badge: ConfidenceBadge,
    pub method: String,
}

pub trait PipelineView {
    fn show_stages(&mut self, stages: &[String]);
    fn show_sample(&mut self, sample: &PipelineSampleDisplay);
    fn show_banner(&mut self, banner: &Banner);
}
