// SPDX-License-Identifier: MIT

//! Test doubles shared by the supervisor and worker unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ingest_config::{ConfigError, ConfigManager, ReloadReceiver, WatchErrorReceiver};
use ingest_core::{AllowList, ApplicationId};
use ingest_processor::{Processor, ProcessorError};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub(crate) struct FakeProcessor {
    fail: AtomicBool,
}

impl FakeProcessor {
    pub(crate) fn always_ok() -> Self {
        Self {
            fail: AtomicBool::new(false),
        }
    }

    pub(crate) fn always_fails() -> Self {
        Self {
            fail: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl Processor for FakeProcessor {
    async fn process(&self, _ctx: CancellationToken, _app: &ApplicationId) -> Result<(), ProcessorError> {
        // Cooperative yield so a single-threaded test runtime can still
        // schedule the driving test task between worker iterations.
        tokio::task::yield_now().await;
        if self.fail.load(Ordering::SeqCst) {
            Err(ProcessorError::Unscannable(std::io::Error::other("boom")))
        } else {
            Ok(())
        }
    }
}

/// A [`ConfigManager`] whose reload/error channels and allow-list snapshot
/// are driven directly by test code via [`FakeConfigManager::handle`].
pub(crate) struct FakeConfigManager {
    allow_list: parking_lot::RwLock<AllowList>,
    reload_tx: Mutex<Option<mpsc::Sender<()>>>,
    err_tx: Mutex<Option<mpsc::Sender<ConfigError>>>,
}

impl FakeConfigManager {
    pub(crate) fn new(allow_list: AllowList) -> Arc<Self> {
        Arc::new(Self {
            allow_list: parking_lot::RwLock::new(allow_list),
            reload_tx: Mutex::new(None),
            err_tx: Mutex::new(None),
        })
    }

    pub(crate) fn set_allow_list(&self, allow_list: AllowList) {
        *self.allow_list.write() = allow_list;
    }

    pub(crate) async fn trigger_reload(&self) {
        let tx = self.reload_tx.lock().clone();
        if let Some(tx) = tx {
            let _ = tx.send(()).await;
        }
    }

    pub(crate) async fn trigger_error(&self, e: ConfigError) {
        let tx = self.err_tx.lock().clone();
        if let Some(tx) = tx {
            let _ = tx.send(e).await;
        }
    }

    /// Drops the reload sender, closing the channel as seen by a
    /// supervisor `run()` loop — models an external collaborator that
    /// has permanently stopped producing events.
    pub(crate) fn close_reload_channel(&self) {
        self.reload_tx.lock().take();
    }

    pub(crate) fn close_err_channel(&self) {
        self.err_tx.lock().take();
    }
}

#[async_trait]
impl ConfigManager for FakeConfigManager {
    async fn watch(
        &self,
        _ctx: CancellationToken,
    ) -> Result<(ReloadReceiver, WatchErrorReceiver), ConfigError> {
        let (reload_tx, reload_rx) = mpsc::channel(8);
        let (err_tx, err_rx) = mpsc::channel(8);
        *self.reload_tx.lock() = Some(reload_tx);
        *self.err_tx.lock() = Some(err_tx);
        Ok((reload_rx, err_rx))
    }

    fn allow_list(&self) -> AllowList {
        self.allow_list.read().clone()
    }
}
