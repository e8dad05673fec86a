use super::{apply_env, apply_file, load_settings, Settings};

use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_wait_forever_and_store_under_data_dir() {
    let settings = Settings::default();
    assert_eq!(settings.rpc_timeout(), None);
    assert_eq!(settings.log_filter, "info");
    assert_eq!(settings.inbound_capacity, dispatcher::DEFAULT_INBOUND_CAPACITY);
    assert!(settings.storage_path.ends_with("smartphone-nui/local_storage.json"));
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
            resource_name = "phone"
            catalog_dir = "locales"
            rpc_timeout_ms = 2500
        "#,
    )
    .expect("valid file");

    assert_eq!(settings.resource_name.as_deref(), Some("phone"));
    assert_eq!(settings.catalog_dir, Some(PathBuf::from("locales")));
    assert_eq!(settings.rpc_timeout(), Some(Duration::from_millis(2500)));
    assert_eq!(settings.base_url, None);
}

#[test]
fn unknown_file_keys_are_rejected() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "bind_addr = \"0.0.0.0\"").is_err());
}

#[test]
fn app_prefixed_env_wins_over_short_names() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("NUI_RESOURCE_NAME", "short"),
            ("APP__RESOURCE_NAME", "app"),
            ("NUI_BASE_URL", "http://127.0.0.1:3000/"),
            ("NUI_INBOUND_CAPACITY", "8"),
            ("APP__RPC_TIMEOUT_MS", "not-a-number"),
        ]),
    );

    assert_eq!(settings.resource_name.as_deref(), Some("app"));
    assert_eq!(settings.base_url.as_deref(), Some("http://127.0.0.1:3000/"));
    assert_eq!(settings.inbound_capacity, 8);
    assert_eq!(settings.rpc_timeout_ms, None);
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings(Some(&dir.path().join("absent.toml"))).expect("defaults");
    assert_eq!(settings.catalog_dir, Settings::default().catalog_dir);
}

#[test]
fn malformed_file_names_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nui.toml");
    fs::write(&path, "inbound_capacity = \"lots\"").expect("write");

    let err = load_settings(Some(&path)).expect_err("malformed");
    assert!(err.to_string().contains("nui.toml"), "{err}");
}
