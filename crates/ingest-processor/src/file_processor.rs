// SPDX-License-Identifier: MIT

//! Concrete [`Processor`]: enumerates `{reports_root}/{app}/*.json`, parses
//! and schema-validates each file, commits accepted payloads to the store,
//! and quarantines the rest.

use async_trait::async_trait;
use ingest_core::ApplicationId;
use ingest_schema::SchemaStore;
use ingest_store::ReportStore;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::processor::{Processor, ProcessorError};

/// Soft cap on files examined per `process` call, bounding one pass to a
/// finite scan rather than an unbounded drain (spec.md §4.4).
pub const DEFAULT_MAX_BATCH: usize = 64;

const QUARANTINE_DIR: &str = ".quarantine";

pub struct FileProcessor {
    reports_root: PathBuf,
    schemas: Arc<SchemaStore>,
    store: Arc<ReportStore>,
    max_batch: usize,
}

impl FileProcessor {
    pub fn new(reports_root: impl Into<PathBuf>, schemas: Arc<SchemaStore>, store: Arc<ReportStore>) -> Self {
        Self {
            reports_root: reports_root.into(),
            schemas,
            store,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    async fn process_one(&self, app: &ApplicationId, path: &Path) -> Result<(), ProcessorError> {
        let app_dir = self.reports_root.join(app.as_str());

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read report file");
                quarantine(&app_dir, path, &format!("read error: {e}"));
                return Ok(());
            }
        };

        let value: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "report is not valid JSON");
                quarantine(&app_dir, path, &format!("invalid JSON: {e}"));
                return Ok(());
            }
        };

        if let Err(e) = self.schemas.validate(app, &value) {
            debug!(path = %path.display(), error = %e, "report failed schema validation");
            quarantine(&app_dir, path, &e.to_string());
            return Ok(());
        }

        let digest = hex_digest(&bytes);
        self.store
            .commit_report(app, &digest, &value)
            .await
            .map_err(ProcessorError::StoreUnavailable)?;

        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove committed report file");
        }

        Ok(())
    }
}

#[async_trait]
impl Processor for FileProcessor {
    async fn process(&self, ctx: CancellationToken, app: &ApplicationId) -> Result<(), ProcessorError> {
        if ctx.is_cancelled() {
            return Err(ProcessorError::Cancelled);
        }

        let app_dir = self.reports_root.join(app.as_str());
        let files = match list_pending_files(&app_dir, self.max_batch) {
            Ok(files) => files,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(ProcessorError::Unscannable(e)),
        };

        for path in files {
            if ctx.is_cancelled() {
                return Err(ProcessorError::Cancelled);
            }
            self.process_one(app, &path).await?;
        }

        Ok(())
    }
}

fn list_pending_files(app_dir: &Path, max_batch: usize) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(app_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("json"))
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    files.sort();
    files.truncate(max_batch);
    Ok(files)
}

fn quarantine(app_dir: &Path, path: &Path, reason: &str) {
    let quarantine_dir = app_dir.join(QUARANTINE_DIR);
    if let Err(e) = std::fs::create_dir_all(&quarantine_dir) {
        warn!(error = %e, "failed to create quarantine directory");
        return;
    }
    let Some(name) = path.file_name() else {
        return;
    };
    let dest = quarantine_dir.join(name);
    if let Err(e) = std::fs::rename(path, &dest) {
        warn!(path = %path.display(), error = %e, "failed to quarantine report file");
        return;
    }
    let reason_path = quarantine_dir.join(format!("{}.reason", name.to_string_lossy()));
    if let Err(e) = std::fs::write(&reason_path, reason) {
        warn!(error = %e, "failed to write quarantine reason sidecar");
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "file_processor_tests.rs"]
mod tests;
