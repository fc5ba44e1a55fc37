// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ingest-schema: per-application JSON Schema loading, compilation, and
//! validation. The distilled spec names "the JSON-schema source" as an
//! external collaborator (spec.md §1); this crate is a concrete,
//! file-backed one.

use ingest_core::ApplicationId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors raised while loading or evaluating a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("no schema registered for application {0}")]
    NotFound(ApplicationId),

    #[error("failed to read schema for {app}: {source}")]
    Read {
        app: ApplicationId,
        #[source]
        source: std::io::Error,
    },

    #[error("schema for {app} is not valid JSON: {source}")]
    Json {
        app: ApplicationId,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema for {app} failed to compile: {message}")]
    Compile { app: ApplicationId, message: String },

    #[error("report for {app} failed schema validation: {message}")]
    Invalid { app: ApplicationId, message: String },
}

/// Loads and caches a compiled `jsonschema::Validator` per application,
/// reading from `{schemas_root}/{app_id}.schema.json`.
pub struct SchemaStore {
    root: PathBuf,
    cache: RwLock<HashMap<ApplicationId, Arc<jsonschema::Validator>>>,
}

impl SchemaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Validate `instance` against the application's compiled schema,
    /// compiling and caching it on first use.
    pub fn validate(
        &self,
        app: &ApplicationId,
        instance: &serde_json::Value,
    ) -> Result<(), SchemaError> {
        let validator = self.load_or_compile(app)?;
        validator.validate(instance).map_err(|e| SchemaError::Invalid {
            app: app.clone(),
            message: e.to_string(),
        })
    }

    /// Force compilation (and schema-file existence/validity) without
    /// validating a report — used by the `check-config` CLI subcommand to
    /// catch a broken schema before the service ever ingests a report.
    pub fn precompile(&self, app: &ApplicationId) -> Result<(), SchemaError> {
        self.load_or_compile(app).map(|_| ())
    }

    fn load_or_compile(&self, app: &ApplicationId) -> Result<Arc<jsonschema::Validator>, SchemaError> {
        if let Some(validator) = self.cache.read().get(app) {
            return Ok(Arc::clone(validator));
        }

        let path = self.schema_path(app);
        if !path.exists() {
            return Err(SchemaError::NotFound(app.clone()));
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| SchemaError::Read {
            app: app.clone(),
            source,
        })?;
        let schema_json: serde_json::Value =
            serde_json::from_str(&contents).map_err(|source| SchemaError::Json {
                app: app.clone(),
                source,
            })?;
        let validator = jsonschema::validator_for(&schema_json).map_err(|e| SchemaError::Compile {
            app: app.clone(),
            message: e.to_string(),
        })?;
        let validator = Arc::new(validator);
        self.cache.write().insert(app.clone(), Arc::clone(&validator));
        Ok(validator)
    }

    fn schema_path(&self, app: &ApplicationId) -> PathBuf {
        self.root.join(format!("{}.schema.json", app.as_str()))
    }
}

/// Write a schema file for `app` under `root` — a test/setup convenience,
/// not used by the service itself.
pub fn write_schema(root: &Path, app: &ApplicationId, schema: &serde_json::Value) -> std::io::Result<()> {
    std::fs::create_dir_all(root)?;
    std::fs::write(
        root.join(format!("{}.schema.json", app.as_str())),
        serde_json::to_vec_pretty(schema)?,
    )
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
