#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use webstats_core::error::ErrorCode;
use webstats_server::config::{self, ConfigStore, JsonFileStore, MemoryStore, Settings};

#[test]
fn absent_file_is_created_with_default_port() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/webstats/settings.json");
    let store = JsonFileStore::new(&path);

    let settings = config::load_or_init(&store).expect("must init");
    assert_eq!(settings.server_port, 4545);
    assert!(path.exists());

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["server_port"], 4545);

    // Second load reads what was written instead of re-creating it.
    std::fs::write(&path, r#"{ "server_port": 8123 }"#).unwrap();
    assert_eq!(config::load_or_init(&store).unwrap().server_port, 8123);
}

#[test]
fn non_json_file_is_recreated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "server_port = 1").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.load().unwrap().is_none());
    assert_eq!(config::load_or_init(&store).unwrap().server_port, 4545);
    assert!(store.load().unwrap().is_some());
}

#[test]
fn deny_unknown_fields() {
    let bad = r#"{ "server_port": 4545, "sever_host": "0.0.0.0" }"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::Configuration);

    // Schema errors in a stored file are not silently overwritten.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, bad).unwrap();
    let err = config::load_or_init(&JsonFileStore::new(&path)).expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::Configuration);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), bad);
}

#[test]
fn ok_minimal_settings() {
    let s = config::load_from_str(r#"{ "server_port": 9000 }"#).expect("must parse");
    assert_eq!(s.server_port, 9000);
    assert_eq!(s.bind_host, "0.0.0.0");
    assert_eq!(s.template_path, "webtemplate.html");
    assert_eq!(s.listen_addr(), "0.0.0.0:9000");
    assert_eq!(s.startup_delay().as_secs(), 10);

    let empty = config::load_from_str("{}").unwrap();
    assert_eq!(empty, Settings::default());
}

#[test]
fn value_ranges_are_checked() {
    for bad in [
        r#"{ "render_timeout_ms": 5 }"#,
        r#"{ "startup_delay_ms": 900000 }"#,
        r#"{ "bind_host": " " }"#,
        r#"{ "server_port": 70000 }"#,
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code(), ErrorCode::Configuration, "{bad}");
    }
}

#[test]
fn ipv6_listen_addr_is_bracketed() {
    let s = Settings {
        bind_host: "::".into(),
        ..Settings::default()
    };
    assert_eq!(s.listen_addr(), "[::]:4545");
}

#[test]
fn memory_store_is_populated_once() {
    let store = MemoryStore::new();
    assert!(store.get().is_none());
    let first = config::load_or_init(&store).unwrap();
    assert_eq!(store.get(), Some(first.clone()));

    let custom = Settings {
        server_port: 0,
        ..Settings::default()
    };
    let store = MemoryStore::with(custom.clone());
    assert_eq!(config::load_or_init(&store).unwrap(), custom);
}
