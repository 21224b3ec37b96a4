//! Upload → process → results state machine for a single document.

use std::sync::Arc;

use shared::{
    domain::{department_for, ConfidenceBadge, DocumentId, Section},
    error::ValidationError,
    protocol::{ProcessResponse, ReclassifyResponse},
};
use tracing::{info, warn};

use crate::{
    error::ClientError,
    validation::{validate_selection, FileSelection, SelectionSource},
    view::{Banner, ClassificationDisplay, WorkflowView},
    DocuflowApi,
};

pub const UPLOAD_FAILED: &str = "Upload failed";
pub const PROCESSING_FAILED: &str = "Processing failed";
pub const RECLASSIFY_FAILED: &str = "Reclassification failed";

const UNKNOWN_TYPE: &str = "Unknown";
const UNKNOWN_METHOD: &str = "N/A";
const UNASSIGNED_DEPARTMENT: &str = "Unassigned";
const NO_EXTRACTED_TEXT: &str = "No text extracted";

const UPLOADING_PROGRESS: (u8, &str) = (25, "Uploading document...");
const PROCESSING_PROGRESS: (u8, &str) = (60, "Extracting text and classifying...");
const COMPLETE_PROGRESS: (u8, &str) = (100, "Complete");

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    Uploading { file_name: String },
    Processing { document_id: DocumentId },
    Results(ClassificationDisplay),
    Error { message: String },
}

impl WorkflowState {
    pub fn section(&self) -> Section {
        match self {
            Self::Idle => Section::Idle,
            Self::Uploading { .. } | Self::Processing { .. } => Section::Progress,
            Self::Results(_) => Section::Results,
            Self::Error { .. } => Section::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading { .. } => "uploading",
            Self::Processing { .. } => "processing",
            Self::Results(_) => "results",
            Self::Error { .. } => "error",
        }
    }

    fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading { .. } | Self::Processing { .. })
    }
}

pub struct UploadWorkflowController<V: WorkflowView> {
    api: Arc<dyn DocuflowApi>,
    view: V,
    state: WorkflowState,
    document_id: Option<DocumentId>,
}

impl<V: WorkflowView> UploadWorkflowController<V> {
    pub fn new(api: Arc<dyn DocuflowApi>, mut view: V) -> Self {
        view.show_section(Section::Idle);
        Self {
            api,
            view,
            state: WorkflowState::Idle,
            document_id: None,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Handles a picked or dropped file and drives it through upload and
    /// processing. Validation failures never reach the network.
    pub async fn select_file(
        &mut self,
        selection: FileSelection,
        source: SelectionSource,
    ) -> &WorkflowState {
        if self.state.is_busy() {
            warn!(
                state = self.state.name(),
                "file selection ignored while a document is in flight"
            );
            return &self.state;
        }

        if let Err(err) = validate_selection(&selection) {
            info!(
                file_name = %selection.file_name,
                ?source,
                reason = %err,
                "file rejected by client-side validation"
            );
            self.fail(err.to_string());
            return &self.state;
        }

        info!(
            file_name = %selection.file_name,
            size_bytes = selection.size_bytes,
            ?source,
            "file accepted"
        );

        let Some(document_id) = self.upload(&selection).await else {
            return &self.state;
        };
        self.process(document_id).await;
        &self.state
    }

    async fn upload(&mut self, selection: &FileSelection) -> Option<DocumentId> {
        self.transition(WorkflowState::Uploading {
            file_name: selection.file_name.clone(),
        });
        self.view
            .show_progress(UPLOADING_PROGRESS.0, UPLOADING_PROGRESS.1);

        match self.api.upload(selection).await {
            Ok(document_id) => {
                self.document_id = Some(document_id.clone());
                Some(document_id)
            }
            Err(err) => {
                warn!(error = %err, "upload failed");
                self.fail(err.user_message(UPLOAD_FAILED));
                None
            }
        }
    }

    async fn process(&mut self, document_id: DocumentId) {
        self.transition(WorkflowState::Processing {
            document_id: document_id.clone(),
        });
        self.view
            .show_progress(PROCESSING_PROGRESS.0, PROCESSING_PROGRESS.1);

        match self.api.process(&document_id).await {
            Ok(response) => {
                let results = display_from_process(document_id, response);
                self.view
                    .show_progress(COMPLETE_PROGRESS.0, COMPLETE_PROGRESS.1);
                self.view.show_results(&results);
                info!(
                    document_id = %results.document_id,
                    doc_type = %results.doc_type,
                    confidence = results.confidence,
                    department = %results.department,
                    "document classified"
                );
                self.transition(WorkflowState::Results(results));
            }
            Err(err) => {
                warn!(document_id = %document_id, error = %err, "processing failed");
                self.fail(err.user_message(PROCESSING_FAILED));
            }
        }
    }

    /// Applies a user-chosen label to the current result. Only valid while
    /// results are shown; updates the fields in place without a transition.
    pub async fn reclassify(&mut self, new_type: &str) -> Result<(), ClientError> {
        let WorkflowState::Results(current) = &self.state else {
            return Err(ClientError::InvalidState {
                action: "reclassification",
                state: self.state.name(),
            });
        };
        let document_id = current.document_id.clone();

        let new_type = new_type.trim();
        if new_type.is_empty() {
            let err = ValidationError::EmptyLabel;
            self.view.show_banner(&Banner::error(err.to_string()));
            return Err(err.into());
        }

        match self.api.reclassify(&document_id, new_type).await {
            Ok(response) => {
                let WorkflowState::Results(results) = &mut self.state else {
                    return Ok(());
                };
                apply_reclassification(results, new_type, response);
                self.view.update_classification(results);
                self.view.show_banner(&Banner::success(format!(
                    "Document reclassified as {}",
                    results.doc_type
                )));
                info!(
                    document_id = %document_id,
                    doc_type = %results.doc_type,
                    department = %results.department,
                    "document reclassified"
                );
                Ok(())
            }
            Err(err) => {
                warn!(document_id = %document_id, error = %err, "reclassification failed");
                self.view
                    .show_banner(&Banner::error(err.user_message(RECLASSIFY_FAILED)));
                Err(err)
            }
        }
    }

    /// Returns to the upload form from any state.
    pub fn reset(&mut self) {
        self.document_id = None;
        self.view.clear_file_input();
        self.transition(WorkflowState::Idle);
    }

    fn fail(&mut self, message: String) {
        self.view.show_error(&message);
        self.transition(WorkflowState::Error { message });
    }

    fn transition(&mut self, next: WorkflowState) {
        let from = self.state.name();
        let section = next.section();
        self.state = next;
        info!(from, to = self.state.name(), "workflow transition");
        self.view.show_section(section);
    }
}

fn display_from_process(document_id: DocumentId, response: ProcessResponse) -> ClassificationDisplay {
    let classification = response.classification.unwrap_or_default();
    let routing = response.routing.unwrap_or_default();

    let doc_type = classification.doc_type.unwrap_or_else(|| {
        warn!(document_id = %document_id, "process response missing classification.type");
        UNKNOWN_TYPE.to_string()
    });
    let confidence = classification.confidence.unwrap_or_else(|| {
        warn!(document_id = %document_id, "process response missing classification.confidence");
        0.0
    });
    let method = classification.method.unwrap_or_else(|| UNKNOWN_METHOD.to_string());
    let department = routing.department.unwrap_or_else(|| {
        warn!(document_id = %document_id, "process response missing routing.department");
        UNASSIGNED_DEPARTMENT.to_string()
    });
    let extracted_text = response
        .extracted_text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| NO_EXTRACTED_TEXT.to_string());

    ClassificationDisplay {
        document_id,
        doc_type,
        confidence,
        badge: ConfidenceBadge::from_score(confidence),
        method,
        department,
        extracted_text,
    }
}

fn apply_reclassification(
    display: &mut ClassificationDisplay,
    requested_type: &str,
    response: ReclassifyResponse,
) {
    let document = response.document;
    display.doc_type = document
        .as_ref()
        .and_then(|document| document.document_type.clone())
        .unwrap_or_else(|| requested_type.to_string());
    // Manual labels are treated as certain unless the server says otherwise.
    display.confidence = document
        .as_ref()
        .and_then(|document| document.confidence_score)
        .unwrap_or(1.0);
    display.badge = ConfidenceBadge::from_score(display.confidence);
    display.department = response
        .routing
        .and_then(|routing| routing.department)
        .or_else(|| document.and_then(|document| document.routed_to))
        .unwrap_or_else(|| department_for(&display.doc_type).to_string());
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
