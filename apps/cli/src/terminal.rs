//! Plain-text rendering of the controller views.

use std::{
    fmt,
    io::{self, Write},
};

use client_core::view::{
    Banner, BannerKind, ChartRenderer, ChartSpec, ChatEntry, ChatRole, ChatView,
    ClassificationDisplay, DashboardCounts, DashboardView, PipelineSampleDisplay, PipelineView,
    RoutingSummaryRow, WorkflowView,
};
use shared::{
    domain::{ConfidenceLevel, Section},
    protocol::AnalyticsCharts,
};
use tracing::debug;

const BAR_WIDTH: usize = 30;
const TEXT_PREVIEW_CHARS: usize = 300;

pub struct TerminalView<W: Write> {
    out: W,
    visible: Option<Section>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, visible: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{args}") {
            debug!(error = %err, "terminal write failed");
        }
    }

    fn banner(&mut self, banner: &Banner) {
        let tag = match banner.kind {
            BannerKind::Success => "ok",
            BannerKind::Error => "error",
            BannerKind::Info => "info",
        };
        self.line(format_args!("[{tag}] {}", banner.message));
    }
}

fn section_title(section: Section) -> &'static str {
    match section {
        Section::Idle => "Upload",
        Section::Progress => "Processing",
        Section::Results => "Results",
        Section::Error => "Error",
    }
}

pub fn badge_style(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "HIGH",
        ConfidenceLevel::Medium => "MEDIUM",
        ConfidenceLevel::Low => "LOW",
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TEXT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

impl<W: Write> WorkflowView for TerminalView<W> {
    fn show_section(&mut self, section: Section) {
        if self.visible == Some(section) {
            return;
        }
        self.visible = Some(section);
        self.line(format_args!("== {} ==", section_title(section)));
    }

    fn show_progress(&mut self, percent: u8, message: &str) {
        self.line(format_args!("[{percent:>3}%] {message}"));
    }

    fn show_results(&mut self, results: &ClassificationDisplay) {
        self.line(format_args!("Document:   {}", results.document_id));
        self.update_classification(results);
        self.line(format_args!("Method:     {}", results.method));
        self.line(format_args!("Text:       {}", preview(&results.extracted_text)));
    }

    fn update_classification(&mut self, results: &ClassificationDisplay) {
        self.line(format_args!("Type:       {}", results.doc_type));
        self.line(format_args!(
            "Confidence: {} ({})",
            results.badge.text,
            badge_style(results.badge.level)
        ));
        self.line(format_args!("Department: {}", results.department));
    }

    fn show_error(&mut self, message: &str) {
        self.line(format_args!("{message}"));
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.banner(banner);
    }

    fn clear_file_input(&mut self) {
        debug!("file input cleared");
    }
}

impl<W: Write> DashboardView for TerminalView<W> {
    fn show_counts(&mut self, counts: &DashboardCounts) {
        self.line(format_args!(
            "Total: {}  Completed: {}  Processing: {}  Errors: {}  Avg confidence: {:.0}%",
            counts.total,
            counts.completed,
            counts.processing,
            counts.error,
            counts.average_confidence * 100.0
        ));
    }

    fn show_routing_summary(&mut self, rows: &[RoutingSummaryRow]) {
        self.line(format_args!("Routing:"));
        for row in rows {
            self.line(format_args!(
                "  {:<16} {}",
                row.department, row.document_count
            ));
        }
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.banner(banner);
    }
}

impl<W: Write> PipelineView for TerminalView<W> {
    fn show_stages(&mut self, stages: &[String]) {
        self.line(format_args!("Pipeline: {}", stages.join(" -> ")));
    }

    fn show_sample(&mut self, sample: &PipelineSampleDisplay) {
        self.line(format_args!(
            "  {:<16} {:<16} {:>4} {:<6} {}",
            sample.key,
            sample.doc_type,
            sample.badge.text,
            badge_style(sample.badge.level),
            sample.method
        ));
        self.line(format_args!("    \"{}\"", sample.sample_text));
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.banner(banner);
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn append(&mut self, entry: &ChatEntry) {
        let speaker = match entry.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "assistant",
        };
        self.line(format_args!("{speaker}: {}", entry.text));
    }
}

/// Prints the analytics page series: upload trend, routing share, type counts
/// and per-method accuracy.
pub fn render_analytics_charts<W: Write>(
    out: &mut W,
    charts: &AnalyticsCharts,
) -> io::Result<()> {
    writeln!(out, "Processing trend (last 7 days):")?;
    let peak = charts
        .processing_trends
        .points()
        .map(|(_, count)| count)
        .max()
        .unwrap_or(0);
    if peak == 0 {
        writeln!(out, "  (no uploads)")?;
    }
    for (date, count) in charts.processing_trends.points().filter(|_| peak > 0) {
        let filled = (count as f64 / peak as f64 * BAR_WIDTH as f64).round() as usize;
        writeln!(
            out,
            "  {date:<20} {:<width$} {count:>4}",
            "#".repeat(filled),
            width = BAR_WIDTH
        )?;
    }

    writeln!(out, "Routing distribution:")?;
    if charts.routing_distribution.is_empty() {
        writeln!(out, "  (nothing routed)")?;
    }
    for (department, count) in &charts.routing_distribution {
        writeln!(out, "  {department:<16} {count:>4}")?;
    }

    writeln!(out, "Document types:")?;
    for (doc_type, count) in &charts.type_distribution {
        writeln!(out, "  {doc_type:<16} {count:>4}")?;
    }

    writeln!(out, "Classification accuracy by method:")?;
    for (method, score) in charts
        .classification_methods
        .iter()
        .zip(&charts.accuracy_scores)
    {
        writeln!(out, "  {method:<16} {score:>3.0}%")?;
    }
    Ok(())
}

/// Renders doughnut charts as labelled share bars. Tracks live instances so a
/// leaked chart shows up in the logs.
pub struct TerminalCharts<W: Write> {
    out: W,
    next_id: u64,
    live: usize,
}

impl<W: Write> TerminalCharts<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_id: 0,
            live: 0,
        }
    }

    pub fn live(&self) -> usize {
        self.live
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, spec: &ChartSpec) -> io::Result<()> {
        writeln!(self.out, "{}:", spec.title)?;
        let total = spec
            .values
            .iter()
            .fold(0u64, |acc, value| acc.saturating_add(*value));
        if total == 0 {
            writeln!(self.out, "  (no documents)")?;
            return Ok(());
        }
        for (label, value) in spec.labels.iter().zip(&spec.values) {
            let share = *value as f64 / total as f64;
            let filled = (share * BAR_WIDTH as f64).round() as usize;
            writeln!(
                self.out,
                "  {label:<16} {:<width$} {value:>4} ({:.0}%)",
                "#".repeat(filled),
                share * 100.0,
                width = BAR_WIDTH
            )?;
        }
        Ok(())
    }
}

impl<W: Write> ChartRenderer for TerminalCharts<W> {
    type Handle = u64;

    fn create(&mut self, spec: &ChartSpec) -> u64 {
        self.next_id += 1;
        self.live += 1;
        if let Err(err) = self.render(spec) {
            debug!(error = %err, "chart render failed");
        }
        debug!(chart = self.next_id, live = self.live, "chart created");
        self.next_id
    }

    fn destroy(&mut self, handle: u64) {
        self.live = self.live.saturating_sub(1);
        debug!(chart = handle, live = self.live, "chart destroyed");
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
