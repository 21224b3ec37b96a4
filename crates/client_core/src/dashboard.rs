use std::{collections::BTreeMap, sync::Arc};

use shared::{domain::department_for, protocol::StatsResponse};
use tracing::{debug, warn};

use crate::{
    error::ClientError,
    view::{
        Banner, ChartKind, ChartRenderer, ChartSpec, DashboardCounts, DashboardView,
        RoutingSummaryRow,
    },
    DocuflowApi,
};

pub const STATS_FAILED: &str = "Failed to load dashboard statistics";
const DISTRIBUTION_TITLE: &str = "Document Types";

/// Sums type counts per routed department. Rows come back ordered by
/// department name.
pub fn routing_summary(distribution: &BTreeMap<String, u64>) -> Vec<RoutingSummaryRow> {
    let mut per_department: BTreeMap<&'static str, u64> = BTreeMap::new();
    for (doc_type, count) in distribution {
        let total = per_department.entry(department_for(doc_type)).or_default();
        *total = total.saturating_add(*count);
    }
    per_department
        .into_iter()
        .map(|(department, document_count)| RoutingSummaryRow {
            department: department.to_string(),
            document_count,
        })
        .collect()
}

pub fn distribution_chart(distribution: &BTreeMap<String, u64>) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        title: DISTRIBUTION_TITLE.to_string(),
        labels: distribution.keys().cloned().collect(),
        values: distribution.values().copied().collect(),
    }
}

impl From<&StatsResponse> for DashboardCounts {
    fn from(stats: &StatsResponse) -> Self {
        Self {
            total: stats.total_documents,
            completed: stats.completed_documents,
            processing: stats.processing_documents,
            error: stats.error_documents,
            average_confidence: stats.average_confidence,
        }
    }
}

pub struct DashboardStatsViewer<V: DashboardView, R: ChartRenderer> {
    api: Arc<dyn DocuflowApi>,
    view: V,
    renderer: R,
    chart: Option<R::Handle>,
}

impl<V: DashboardView, R: ChartRenderer> DashboardStatsViewer<V, R> {
    pub fn new(api: Arc<dyn DocuflowApi>, view: V, renderer: R) -> Self {
        Self {
            api,
            view,
            renderer,
            chart: None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn has_chart(&self) -> bool {
        self.chart.is_some()
    }

    /// Full refresh from `/api/stats`: counts, distribution chart, and the
    /// per-department routing summary. On failure the previous render stays.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let stats = match self.api.stats().await {
            Ok(stats) => stats,
            Err(err) => return Err(self.report(err)),
        };

        self.view.show_counts(&DashboardCounts::from(&stats));
        self.rebuild_chart(&stats.type_distribution);
        self.view
            .show_routing_summary(&routing_summary(&stats.type_distribution));
        debug!(
            total = stats.total_documents,
            types = stats.type_distribution.len(),
            "dashboard refreshed"
        );
        Ok(())
    }

    /// Counts-only refresh from `/api/dashboard_stats`; the chart is untouched.
    pub async fn refresh_counts(&mut self) -> Result<(), ClientError> {
        match self.api.dashboard_stats().await {
            Ok(stats) => {
                self.view.show_counts(&DashboardCounts::from(&stats));
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Replaces the distribution chart. The previous instance is destroyed
    /// before the new one is created so at most one is ever alive.
    pub fn rebuild_chart(&mut self, distribution: &BTreeMap<String, u64>) {
        if let Some(previous) = self.chart.take() {
            self.renderer.destroy(previous);
        }
        let spec = distribution_chart(distribution);
        self.chart = Some(self.renderer.create(&spec));
    }

    fn report(&mut self, err: ClientError) -> ClientError {
        warn!(error = %err, "dashboard stats request failed");
        self.view
            .show_banner(&Banner::error(err.user_message(STATS_FAILED)));
        err
    }
}

impl<V: DashboardView, R: ChartRenderer> Drop for DashboardStatsViewer<V, R> {
    fn drop(&mut self) {
        if let Some(chart) = self.chart.take() {
            self.renderer.destroy(chart);
        }
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
