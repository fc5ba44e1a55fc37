// SPDX-License-Identifier: MIT

use super::*;
use std::fs;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn write_list(path: &Path, apps: &[&str]) {
    let joined = apps
        .iter()
        .map(|a| format!("\"{a}\""))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(path, format!("applications = [{joined}]\n")).expect("write allow-list");
}

#[test]
fn construction_fails_on_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("allowlist.toml");
    let err = FileConfigManager::new(FileConfigManagerOptions::new(&path));
    assert!(matches!(err, Err(ConfigError::Read { .. })));
}

#[test]
fn construction_fails_on_malformed_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("allowlist.toml");
    fs::write(&path, "not valid toml {{{").expect("write");
    let err = FileConfigManager::new(FileConfigManagerOptions::new(&path));
    assert!(matches!(err, Err(ConfigError::Parse { .. })));
}

#[test]
fn construction_fails_on_empty_application_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("allowlist.toml");
    write_list(&path, &[""]);
    let err = FileConfigManager::new(FileConfigManagerOptions::new(&path));
    assert!(matches!(err, Err(ConfigError::InvalidApplication { .. })));
}

#[test]
fn allow_list_reflects_initial_file_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("allowlist.toml");
    write_list(&path, &["a", "b"]);
    let manager = FileConfigManager::new(FileConfigManagerOptions::new(&path)).expect("manager");
    let list = manager.allow_list();
    assert_eq!(list.len(), 2);
    assert!(list.contains(&ApplicationId::new("a").expect("valid")));
}

#[test]
fn is_allowed_checks_the_snapshot_directly_without_cloning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("allowlist.toml");
    write_list(&path, &["a"]);
    let manager = FileConfigManager::new(FileConfigManagerOptions::new(&path)).expect("manager");

    assert!(manager.is_allowed(&ApplicationId::new("a").expect("valid")));
    assert!(!manager.is_allowed(&ApplicationId::new("b").expect("valid")));
}

#[tokio::test]
async fn watch_emits_reload_and_updates_snapshot_after_file_change() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("allowlist.toml");
    write_list(&path, &["a"]);

    let mut options = FileConfigManagerOptions::new(&path);
    options.debounce = Duration::from_millis(20);
    let manager = FileConfigManager::new(options).expect("manager");

    let ctx = CancellationToken::new();
    let (mut reload_rx, _err_rx) = manager.watch(ctx.clone()).await.expect("watch");

    // Give the watcher a moment to register before mutating the file.
    tokio::time::sleep(Duration::from_millis(100)).await;
    write_list(&path, &["a", "b"]);

    let reload = tokio::time::timeout(Duration::from_secs(5), reload_rx.recv()).await;
    assert!(reload.is_ok(), "expected a reload notification");

    let list = manager.allow_list();
    assert_eq!(list.len(), 2);
    ctx.cancel();
}
