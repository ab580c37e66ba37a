use bindery_domain::config::{BinderyConfig, ServerConfig};
use bindery_domain::constants::{LIBRARY_DIR, LIBRARY_REF, SERVER_CONFIG_FILE, VARIABLES_FILE};
use serde_json::json;
use std::path::PathBuf;

#[test]
fn server_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.dir, PathBuf::from("."));
    assert_eq!(server.library_dir, LIBRARY_DIR);
    assert_eq!(server.library_ref, LIBRARY_REF);
    assert_eq!(server.variables_file, VARIABLES_FILE);
    assert_eq!(server.config_file, SERVER_CONFIG_FILE);
}

#[test]
fn bindery_config_deserializes() {
    let raw = json!({
        "server": { "dir": "/srv/wlp", "library_dir": "clients", "config_file": "app.xml" },
        "services": {
            "opt_out": "redis=all",
            "plugins": "/etc/bindery/plugins.yaml",
            "uris": { "mysql": "https://repo/mysql.jar" }
        }
    });

    let cfg: BinderyConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.library_path(), PathBuf::from("/srv/wlp/clients"));
    assert_eq!(cfg.server.config_path(), PathBuf::from("/srv/wlp/app.xml"));
    assert_eq!(cfg.server.variables_path(), PathBuf::from("/srv/wlp/runtime-vars.xml"));
    assert_eq!(cfg.services.plugins, Some(PathBuf::from("/etc/bindery/plugins.yaml")));
    assert_eq!(cfg.services.uris.len(), 1);
}

#[test]
fn with_dir_keeps_layout() {
    let server = ServerConfig { library_dir: "jars".into(), ..ServerConfig::default() }.with_dir("/opt/app");
    assert_eq!(server.library_path(), PathBuf::from("/opt/app/jars"));
}
