// SPDX-License-Identifier: MIT

//! The mutex-guarded map of currently running workers (spec.md §4.1).

use std::collections::HashMap;

use ingest_core::ApplicationId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub(crate) struct WorkerHandle {
    pub(crate) cancel: CancellationToken,
    pub(crate) join: JoinHandle<()>,
}

pub(crate) type WorkerTable = parking_lot::Mutex<HashMap<ApplicationId, WorkerHandle>>;
