use std::{io, path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ChatWidget, DashboardStatsViewer, DocuflowApi, DocuflowClient, FileSelection, KeyPress,
    PipelineDemoViewer, SelectionSource, UploadWorkflowController, WorkflowState,
};
use shared::domain::ConfidenceBadge;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::load_settings;
use terminal::{badge_style, render_analytics_charts, TerminalCharts, TerminalView};

#[derive(Parser, Debug)]
#[command(name = "docuflow", about = "Upload, classify and track documents")]
struct Cli {
    /// Backend base URL; overrides config file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a document, wait for classification and print the result.
    Upload {
        path: PathBuf,
        /// Manually relabel the document once results are in.
        #[arg(long)]
        reclassify: Option<String>,
    },
    Stats {
        #[arg(long)]
        counts_only: bool,
        /// Keep refreshing every N seconds until interrupted.
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    PipelineDemo,
    /// Chat with the assistant; each stdin line is sent on Enter.
    Chat,
    Documents,
    Analytics,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let client = DocuflowClient::with_timeout(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("failed to build client for {}", settings.server_url))?;
    info!(server_url = client.server_url(), "docuflow client ready");
    let api: Arc<dyn DocuflowApi> = Arc::new(client);

    match cli.command {
        Command::Upload { path, reclassify } => upload(api, path, reclassify).await,
        Command::Stats { counts_only, watch } => stats(api, counts_only, watch).await,
        Command::PipelineDemo => {
            let mut viewer = PipelineDemoViewer::new(api, TerminalView::new(io::stdout()));
            Ok(exit_code(viewer.load().await.is_ok()))
        }
        Command::Chat => chat(api).await,
        Command::Documents => documents(api).await,
        Command::Analytics => analytics(api).await,
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn upload(
    api: Arc<dyn DocuflowApi>,
    path: PathBuf,
    reclassify: Option<String>,
) -> Result<ExitCode> {
    let mut controller = UploadWorkflowController::new(api, TerminalView::new(io::stdout()));
    let selection = FileSelection::from_path(&path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;

    let state = controller
        .select_file(selection, SelectionSource::Picker)
        .await;
    if !matches!(state, WorkflowState::Results(_)) {
        return Ok(ExitCode::FAILURE);
    }

    if let Some(label) = reclassify {
        if let Err(err) = controller.reclassify(&label).await {
            warn!(error = %err, "reclassification did not apply");
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn stats(api: Arc<dyn DocuflowApi>, counts_only: bool, watch: Option<u64>) -> Result<ExitCode> {
    let mut viewer = DashboardStatsViewer::new(
        api,
        TerminalView::new(io::stdout()),
        TerminalCharts::new(io::stdout()),
    );

    let Some(interval_secs) = watch.filter(|secs| *secs > 0) else {
        let outcome = if counts_only {
            viewer.refresh_counts().await
        } else {
            viewer.refresh().await
        };
        return Ok(exit_code(outcome.is_ok()));
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = if counts_only {
                    viewer.refresh_counts().await
                } else {
                    viewer.refresh().await
                };
                // Already surfaced as a banner; keep polling.
                if let Err(err) = outcome {
                    debug!(error = %err, "stats poll failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping stats watch");
                return Ok(ExitCode::SUCCESS);
            }
        }
    }
}

async fn chat(api: Arc<dyn DocuflowApi>) -> Result<ExitCode> {
    let mut widget = ChatWidget::new(api, TerminalView::new(io::stdout()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(mut line) = lines.next_line().await? else {
            break;
        };
        widget.on_key(KeyPress::Enter, &mut line).await;
    }
    Ok(ExitCode::SUCCESS)
}

async fn documents(api: Arc<dyn DocuflowApi>) -> Result<ExitCode> {
    let documents = api.documents().await.context("failed to list documents")?;
    if documents.is_empty() {
        println!("No documents yet.");
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{:>6}  {:<32} {:<11} {:<16} {:>5}  {}",
        "ID", "FILE", "STATUS", "TYPE", "CONF", "ROUTED TO"
    );
    for document in documents {
        let file = document
            .original_filename
            .or(document.filename)
            .unwrap_or_default();
        let status = document
            .status
            .map(|status| format!("{status:?}").to_ascii_lowercase())
            .unwrap_or_else(|| "-".to_string());
        let confidence = document
            .confidence_score
            .map(|score| ConfidenceBadge::from_score(score).text)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:<32} {:<11} {:<16} {:>5}  {}",
            document.id,
            file,
            status,
            document.document_type.as_deref().unwrap_or("-"),
            confidence,
            document.routed_to.as_deref().unwrap_or("-")
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn analytics(api: Arc<dyn DocuflowApi>) -> Result<ExitCode> {
    let metrics = api
        .performance()
        .await
        .context("failed to load performance metrics")?;
    let accuracy = ConfidenceBadge::from_score(metrics.classification_accuracy);
    println!("Avg processing time:     {:.2}s", metrics.avg_processing_time);
    println!(
        "OCR success rate:        {}",
        ConfidenceBadge::from_score(metrics.ocr_success_rate).text
    );
    println!(
        "Classification accuracy: {} ({})",
        accuracy.text,
        badge_style(accuracy.level)
    );
    println!(
        "High confidence:         {} of {} completed",
        metrics.high_confidence, metrics.completed_docs
    );
    println!("Email ingestion:         {}", enabled(metrics.email_configured));
    println!("ML model trained:        {}", enabled(metrics.ml_model_trained));

    let charts = api
        .analytics_charts()
        .await
        .context("failed to load analytics charts")?;
    render_analytics_charts(&mut io::stdout().lock(), &charts)
        .context("failed to print analytics charts")?;

    let activity = api
        .activity()
        .await
        .context("failed to load recent activity")?;
    println!("Recent activity:");
    for entry in activity {
        println!(
            "  {:<20} {:<14} {}",
            entry.timestamp.as_deref().unwrap_or("-"),
            entry.kind,
            entry.title
        );
        if !entry.details.is_empty() {
            println!("  {:<20} {:<14} {}", "", "", entry.details);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
