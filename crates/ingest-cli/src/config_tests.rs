// SPDX-License-Identifier: MIT

use super::*;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn relative_paths_resolve_against_the_config_files_own_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "ingestd.toml",
        r#"
            allow_list_path = "allowlist.toml"
            schemas_root = "schemas"
            reports_root = "reports"
            database_url = "sqlite://ingest.db"
        "#,
    );

    let config = ServiceConfig::load(&path).expect("load config");
    assert_eq!(config.allow_list_path, dir.path().join("allowlist.toml"));
    assert_eq!(config.schemas_root, dir.path().join("schemas"));
    assert_eq!(config.reports_root, dir.path().join("reports"));
    assert_eq!(config.database_url, "sqlite://ingest.db");
}

#[test]
fn absolute_paths_are_left_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "ingestd.toml",
        r#"
            allow_list_path = "/etc/ingest/allowlist.toml"
            schemas_root = "schemas"
            reports_root = "reports"
            database_url = "sqlite://ingest.db"
        "#,
    );

    let config = ServiceConfig::load(&path).expect("load config");
    assert_eq!(config.allow_list_path, PathBuf::from("/etc/ingest/allowlist.toml"));
}

#[test]
fn a_missing_config_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ServiceConfig::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Read { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "ingestd.toml", "not valid toml {{{");
    let err = ServiceConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}
