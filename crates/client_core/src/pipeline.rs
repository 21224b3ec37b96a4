use std::sync::Arc;

use shared::domain::ConfidenceBadge;
use tracing::warn;

use crate::{
    error::ClientError,
    view::{Banner, PipelineSampleDisplay, PipelineView},
    DocuflowApi,
};

pub const PIPELINE_FAILED: &str = "Failed to load pipeline demo";

pub struct PipelineDemoViewer<V: PipelineView> {
    api: Arc<dyn DocuflowApi>,
    view: V,
}

impl<V: PipelineView> PipelineDemoViewer<V> {
    pub fn new(api: Arc<dyn DocuflowApi>, view: V) -> Self {
        Self { api, view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let demo = match self.api.pipeline_demo().await {
            Ok(demo) => demo,
            Err(err) => {
                warn!(error = %err, "pipeline demo request failed");
                self.view
                    .show_banner(&Banner::error(err.user_message(PIPELINE_FAILED)));
                return Err(err);
            }
        };

        self.view.show_stages(&demo.pipeline_stages);
        for (key, sample) in demo.pipeline_demo {
            let result = sample.classification_result;
            let confidence = result.confidence.unwrap_or(0.0);
            self.view.show_sample(&PipelineSampleDisplay {
                key,
                sample_text: sample.sample_text,
                doc_type: result.doc_type.unwrap_or_else(|| "Unknown".to_string()),
                badge: ConfidenceBadge::from_score(confidence),
                method: result.method.unwrap_or_else(|| "N/A".to_string()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
