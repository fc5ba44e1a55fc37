// SPDX-License-Identifier: MIT

//! A [`ConfigManager`] backed by a single TOML allow-list file, watched
//! via `notify` with an internal debounce stage distinct from the
//! supervisor's own 5s reload debounce (spec.md §4.5, §9).

use async_trait::async_trait;
use ingest_core::{AllowList, ApplicationId};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::manager::{ConfigError, ConfigManager, ReloadReceiver, WatchErrorReceiver};

/// Default quiet window the manager waits for filesystem events to settle
/// before re-reading the allow-list file.
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Deserialize)]
struct AllowListDoc {
    #[serde(default)]
    applications: Vec<String>,
}

/// Construction options for [`FileConfigManager`].
#[derive(Debug, Clone)]
pub struct FileConfigManagerOptions {
    pub path: PathBuf,
    pub debounce: Duration,
}

impl FileConfigManagerOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// File-backed [`ConfigManager`]. Construction parses the file once so
/// startup fails fast on a missing or malformed allow-list.
pub struct FileConfigManager {
    path: PathBuf,
    debounce: Duration,
    snapshot: Arc<RwLock<AllowList>>,
}

impl FileConfigManager {
    pub fn new(options: FileConfigManagerOptions) -> Result<Self, ConfigError> {
        let initial = load_allow_list(&options.path)?;
        Ok(Self {
            path: options.path,
            debounce: options.debounce,
            snapshot: Arc::new(RwLock::new(initial)),
        })
    }
}

#[async_trait]
impl ConfigManager for FileConfigManager {
    async fn watch(
        &self,
        ctx: CancellationToken,
    ) -> Result<(ReloadReceiver, WatchErrorReceiver), ConfigError> {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<notify::Result<notify::Event>>();
        let watcher = notify::recommended_watcher(move |res| {
            // The notify callback runs on a watcher-owned thread; if the
            // receiver has already been dropped there is nothing to do.
            let _ = raw_tx.send(res);
        })
        .map_err(|e| ConfigError::WatchSetup(e.to_string()))?;

        // Editors typically replace-on-save, so the parent directory must
        // be watched rather than the file descriptor itself.
        let watch_dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut watcher = watcher;
        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchSetup(e.to_string()))?;

        let (reload_tx, reload_rx) = mpsc::channel::<()>(1);
        let (err_tx, err_rx) = mpsc::channel::<ConfigError>(8);

        let path = self.path.clone();
        let snapshot = Arc::clone(&self.snapshot);
        let debounce = self.debounce;

        tokio::spawn(async move {
            // Keep the watcher alive for the lifetime of this task; it is
            // dropped (and stops watching) when the task exits.
            let _watcher = watcher;
            run_watch_loop(ctx, raw_rx, reload_tx, err_tx, path, snapshot, debounce).await;
        });

        Ok((reload_rx, err_rx))
    }

    fn allow_list(&self) -> AllowList {
        self.snapshot.read().clone()
    }

    fn is_allowed(&self, app: &ApplicationId) -> bool {
        self.snapshot.read().contains(app)
    }
}

async fn run_watch_loop(
    ctx: CancellationToken,
    mut raw_rx: mpsc::UnboundedReceiver<notify::Result<notify::Event>>,
    reload_tx: mpsc::Sender<()>,
    err_tx: mpsc::Sender<ConfigError>,
    path: PathBuf,
    snapshot: Arc<RwLock<AllowList>>,
    debounce: Duration,
) {
    loop {
        let event = tokio::select! {
            _ = ctx.cancelled() => return,
            maybe = raw_rx.recv() => maybe,
        };

        let relevant = match event {
            None => return,
            Some(Ok(event)) => event_touches(&event, &path),
            Some(Err(e)) => {
                let _ = err_tx.send(ConfigError::Notify(e.to_string())).await;
                continue;
            }
        };

        if !relevant {
            continue;
        }

        // Quiet window: absorb further filesystem noise (the multiple
        // write events a single editor save typically produces) before
        // treating the burst as settled.
        loop {
            tokio::select! {
                _ = ctx.cancelled() => return,
                _ = tokio::time::sleep(debounce) => break,
                maybe = raw_rx.recv() => match maybe {
                    None => return,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        let _ = err_tx.send(ConfigError::Notify(e.to_string())).await;
                        continue;
                    }
                },
            }
        }

        match load_allow_list(&path) {
            Ok(list) => {
                debug!(applications = list.len(), "reloaded allow-list");
                *snapshot.write() = list;
                // A reload event carries no payload, so dropping it when a
                // reload is already pending is loss-free: the receiver will
                // re-read the (now current) snapshot anyway.
                if reload_tx.try_send(()).is_err() {
                    debug!("reload notification coalesced");
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to reload allow-list");
                let _ = err_tx.send(e).await;
            }
        }
    }
}

fn event_touches(event: &notify::Event, path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    event.paths.iter().any(|p| p.file_name() == Some(name))
}

fn load_allow_list(path: &Path) -> Result<AllowList, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let doc: AllowListDoc = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    doc.applications
        .into_iter()
        .map(|s| {
            ApplicationId::new(s).map_err(|source| ConfigError::InvalidApplication {
                path: path.display().to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AllowList::from)
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
