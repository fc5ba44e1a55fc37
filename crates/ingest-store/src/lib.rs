// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ingest-store: the relational report store (spec.md §1's "database
//! driver and schema-migration tooling" external collaborator), concretely
//! backed by `sqlx`/SQLite.

use ingest_core::ApplicationId;
use sqlx::sqlite::{SqlitePoolOptions, SqliteQueryResult};
use sqlx::SqlitePool;

/// Errors raised by [`ReportStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to report store: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to run report store migrations: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("report store query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("failed to serialize report payload: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Outcome of a commit attempt. A report already committed under the same
/// `(app, file_digest)` key is not an error — it is the idempotency
/// boundary described in spec.md §1 ("at-most-once commit per validated
/// file within a run").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Inserted,
    AlreadyCommitted,
}

/// A relational store of accepted reports, keyed by `(app_id, file_digest)`.
pub struct ReportStore {
    pool: SqlitePool,
}

impl ReportStore {
    /// Connect to `database_url` and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .connect(database_url)
            .await
            .map_err(StoreError::Connect)?;
        sqlx::migrate!().run(&pool).await.map_err(StoreError::Migrate)?;
        Ok(Self { pool })
    }

    /// Wrap an already-connected, already-migrated pool (used by tests and
    /// by callers that manage their own pool lifecycle).
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a validated report payload, identified by its content
    /// digest, atomically. Re-committing the same `(app, file_digest)`
    /// pair is a no-op that reports [`CommitOutcome::AlreadyCommitted`]
    /// rather than an error.
    pub async fn commit_report(
        &self,
        app: &ApplicationId,
        file_digest: &str,
        payload: &serde_json::Value,
    ) -> Result<CommitOutcome, StoreError> {
        let payload_text = serde_json::to_string(payload).map_err(StoreError::Serialize)?;
        let result: SqliteQueryResult = sqlx::query(
            "INSERT OR IGNORE INTO reports (app_id, file_digest, payload, committed_at) \
             VALUES (?1, ?2, ?3, datetime('now'))",
        )
        .bind(app.as_str())
        .bind(file_digest)
        .bind(payload_text)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        if result.rows_affected() == 0 {
            Ok(CommitOutcome::AlreadyCommitted)
        } else {
            Ok(CommitOutcome::Inserted)
        }
    }

    /// Count of committed reports for an application — used by tests and
    /// the `check-config` CLI subcommand's summary output.
    pub async fn count_reports(&self, app: &ApplicationId) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports WHERE app_id = ?1")
            .bind(app.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Query)?;
        Ok(row.0)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
