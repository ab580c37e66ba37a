use bindery_kernel::config::{ConfigError, load_config, load_document};
use bindery_kernel::domain::config::BinderyConfig;
use serial_test::serial;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn yaml_settings_fill_nested_maps() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bindery.yaml");
    fs::write(
        &path,
        "server:\n  dir: /srv/app\nservices:\n  uris:\n    mysql: https://repo/mysql.jar\n    db2: https://repo/db2.zip\n",
    )
    .unwrap();

    let cfg: BinderyConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.server.dir, PathBuf::from("/srv/app"));
    assert_eq!(cfg.services.uris.get("db2").map(String::as_str), Some("https://repo/db2.zip"));
    assert!(cfg.services.plugins.is_none());
}

#[test]
#[serial]
fn malformed_document_reports_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plugins.json");
    fs::write(&path, "{ not json").unwrap();

    let err = load_document::<BTreeMap<String, String>>(&path).unwrap_err();
    let ConfigError::Config { context, .. } = &err;
    assert!(context.as_deref().is_some_and(|c| c.contains("plugins.json")), "{err}");
}
