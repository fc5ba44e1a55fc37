// SPDX-License-Identifier: MIT

//! `ingestd check-config` — validates the allow-list file and every
//! configured application's JSON schema without starting the service.
//! Grounded in the teacher's `oj check`-style pre-flight validation
//! commands.

use std::path::PathBuf;

use ingest_config::{ConfigManager, FileConfigManager, FileConfigManagerOptions};
use ingest_schema::SchemaStore;

use crate::config::ServiceConfig;

pub async fn check_config(config_path: PathBuf) -> anyhow::Result<()> {
    let config = ServiceConfig::load(&config_path)?;

    let manager = FileConfigManager::new(FileConfigManagerOptions::new(config.allow_list_path.clone()))?;
    let allow_list = manager.allow_list();
    let schemas = SchemaStore::new(config.schemas_root.clone());

    let mut checked = 0usize;
    for app in allow_list.iter() {
        schemas.precompile(app)?;
        checked += 1;
    }

    println!("allow-list: {} (ok, {checked} application(s))", config.allow_list_path.display());
    println!("schemas: {} (ok)", config.schemas_root.display());
    Ok(())
}
