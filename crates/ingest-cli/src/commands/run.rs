// SPDX-License-Identifier: MIT

//! `ingestd run` — wires the concrete collaborators and runs the service
//! until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use ingest_config::{ConfigManager, FileConfigManager, FileConfigManagerOptions};
use ingest_metrics::PrometheusMetrics;
use ingest_pool::{BackoffConfig, Supervisor};
use ingest_processor::{FileProcessor, Processor};
use ingest_schema::SchemaStore;
use ingest_service::Service;
use ingest_store::ReportStore;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::env;

pub async fn run(config_path: PathBuf) -> anyhow::Result<()> {
    let config = ServiceConfig::load(&config_path)?;

    let schemas = Arc::new(SchemaStore::new(config.schemas_root.clone()));
    let store = Arc::new(ReportStore::connect(&config.database_url).await?);
    let processor: Arc<dyn Processor> =
        Arc::new(FileProcessor::new(config.reports_root.clone(), schemas, store));

    let config_manager: Arc<dyn ConfigManager> = Arc::new(FileConfigManager::new(
        FileConfigManagerOptions::new(config.allow_list_path.clone()),
    )?);

    let metrics = Arc::new(PrometheusMetrics::new());
    let mut supervisor = Supervisor::new(config_manager, processor, metrics.as_ref())?;
    if let Some(debounce) = env::debounce() {
        supervisor = supervisor.with_debounce(debounce);
    }
    if let (Some(base), Some(max)) = (env::backoff_base_ms(), env::backoff_max_ms()) {
        supervisor = supervisor.with_backoff(BackoffConfig { base, max });
    }
    let supervisor = Arc::new(supervisor);

    let metrics_addr = env::metrics_addr()?;
    let mut service = Service::new(supervisor, metrics, metrics_addr);
    if let Some(d) = env::max_degraded_duration() {
        service = service.with_max_degraded_duration(d);
    }
    let service = Arc::new(service);

    tokio::spawn(handle_signals(service.clone()));

    info!(addr = %metrics_addr, "ingestd starting");
    service.run().await.map_err(Into::into)
}

/// First `SIGINT` requests a graceful stop; a second `SIGINT` or any
/// `SIGTERM` forces it. Each request is dispatched to its own task so this
/// loop keeps listening and can escalate without waiting for the current
/// shutdown to finish (spec.md §6).
async fn handle_signals(service: Arc<Service>) {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler");
            return;
        }
    };
    let mut graceful_requested = false;

    loop {
        tokio::select! {
            ctrl_c = tokio::signal::ctrl_c() => {
                if ctrl_c.is_err() {
                    continue;
                }
                if graceful_requested {
                    warn!("second interrupt received, forcing shutdown");
                    spawn_quit(service.clone(), true);
                } else {
                    info!("interrupt received, requesting graceful shutdown");
                    graceful_requested = true;
                    spawn_quit(service.clone(), false);
                }
            }
            _ = sigterm.recv() => {
                warn!("SIGTERM received, forcing shutdown");
                spawn_quit(service.clone(), true);
            }
        }
    }
}

fn spawn_quit(service: Arc<Service>, force: bool) {
    tokio::spawn(async move { service.quit(force).await });
}
