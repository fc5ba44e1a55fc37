// SPDX-License-Identifier: MIT

//! Process-level settings loaded from a TOML file, with environment
//! overrides resolved through [`crate::env`] (spec.md §9).

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// On-disk shape of `ingestd`'s config file. Every path is resolved
/// relative to the file's own parent directory if given as relative.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Path to the allow-list TOML file watched by the Config Manager.
    pub allow_list_path: PathBuf,
    /// Root directory of `{app}.schema.json` files.
    pub schemas_root: PathBuf,
    /// Root directory of `{app}/*.json` report files.
    pub reports_root: PathBuf,
    /// `sqlx` connection string for the report store.
    pub database_url: String,
}

impl ServiceConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.allow_list_path = resolve(base, config.allow_list_path);
        config.schemas_root = resolve(base, config.schemas_root);
        config.reports_root = resolve(base, config.reports_root);
        Ok(config)
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
