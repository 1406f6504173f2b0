use crate::app_state::AppEvent;
use crate::commands::{AppCommand, HELP_TEXT};
use crate::config::DashboardConfig;
use crate::dataset::{load_dataset, Dataset};
use crate::report::{run_pipeline, Selection};
use anyhow::Context;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Loads the configured worksheet off the async runtime.
pub async fn load(config: &DashboardConfig) -> anyhow::Result<Dataset> {
    let path = config.data_file.clone();
    let sheet = config.sheet.clone();
    let label = path.display().to_string();
    let started = Instant::now();
    let dataset = tokio::task::spawn_blocking(move || load_dataset(&path, sheet.as_deref()))
        .await
        .context("loader task aborted")?
        .with_context(|| format!("failed to load {}", label))?;
    info!("dataset ready: {} rows in {:?}", dataset.len(), started.elapsed());
    Ok(dataset)
}

pub async fn refresh_report(
    dataset: &Arc<Dataset>,
    selection: Selection,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let selection_json = serde_json::to_string(&selection).unwrap_or_default();
    let ds = Arc::clone(dataset);
    let started = Instant::now();
    match tokio::task::spawn_blocking(move || run_pipeline(&ds, &selection)).await {
        Ok(report) => {
            info!(
                "report: {} rows, {} customers in {:?} for {}",
                report.metrics.total_products,
                report.metrics.total_customers,
                started.elapsed(),
                selection_json
            );
            let _ = tx.send(AppEvent::Report(Box::new(report)));
        }
        Err(e) => {
            error!("report task failed for {}: {}", selection_json, e);
            let _ = tx.send(AppEvent::Error(format!("✗ report failed: {}", e)));
        }
    }
}

/// Background actor: handles one command at a time, so reports go out in request order.
pub async fn run_command_loop(
    dataset: Arc<Dataset>,
    mut cmd_rx: mpsc::UnboundedReceiver<AppCommand>,
    evt_tx: mpsc::UnboundedSender<AppEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            AppCommand::Refresh { selection } => {
                refresh_report(&dataset, selection, &evt_tx).await;
            }
            AppCommand::Help => {
                let _ = evt_tx.send(AppEvent::Message(HELP_TEXT.to_string()));
            }
            AppCommand::Unknown(msg) => {
                warn!("rejected command: {}", msg);
                let _ = evt_tx.send(AppEvent::Error(format!("✗ {}", msg)));
            }
            other => {
                warn!("command not handled by background loop: {:?}", other);
            }
        }
    }
}
