// SPDX-License-Identifier: MIT

//! The Config Manager contract (spec.md §4.5).

use async_trait::async_trait;
use ingest_core::{AllowList, ApplicationId};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Reload events are an empty signal: any event means "re-read the
/// snapshot". The manager may coalesce events.
pub type ReloadReceiver = mpsc::Receiver<()>;

/// Non-fatal watch errors (e.g. a transient filesystem error). The
/// supervisor logs these and continues.
pub type WatchErrorReceiver = mpsc::Receiver<ConfigError>;

/// Errors surfaced by a [`ConfigManager`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to open config watch: {0}")]
    WatchSetup(String),

    #[error("failed to read allow-list file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse allow-list file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("filesystem watch error: {0}")]
    Notify(String),

    #[error("invalid application id in {path}: {source}")]
    InvalidApplication {
        path: String,
        #[source]
        source: ingest_core::InvalidApplicationId,
    },
}

/// External collaborator responsible for producing the current allow-list
/// and a stream of reload notifications. All I/O (reading files,
/// debouncing at the source, HTTP reloads) is this component's
/// responsibility.
#[async_trait]
pub trait ConfigManager: Send + Sync {
    /// Begin watching for configuration changes for the lifetime of `ctx`.
    /// Returns a reload channel and an error channel; either channel
    /// closing while `ctx` is live is a fatal supervisor error.
    async fn watch(
        &self,
        ctx: CancellationToken,
    ) -> Result<(ReloadReceiver, WatchErrorReceiver), ConfigError>;

    /// Snapshot of the current allow-list. Callers must not mutate the
    /// returned value; it is a copy.
    fn allow_list(&self) -> AllowList;

    /// O(1) membership test against the current snapshot.
    fn is_allowed(&self, app: &ApplicationId) -> bool {
        self.allow_list().contains(app)
    }
}
