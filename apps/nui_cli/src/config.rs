use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use dispatcher::DEFAULT_INBOUND_CAPACITY;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "nui.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub resource_name: Option<String>,
    pub base_url: Option<String>,
    pub storage_path: PathBuf,
    pub catalog_dir: Option<PathBuf>,
    pub log_filter: String,
    pub inbound_capacity: usize,
    pub rpc_timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resource_name: None,
            base_url: None,
            storage_path: default_storage_path(),
            catalog_dir: None,
            log_filter: "info".into(),
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
            rpc_timeout_ms: None,
        }
    }
}

impl Settings {
    pub fn rpc_timeout(&self) -> Option<Duration> {
        self.rpc_timeout_ms.map(Duration::from_millis)
    }
}

fn default_storage_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smartphone-nui")
        .join("local_storage.json")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    resource_name: Option<String>,
    base_url: Option<String>,
    storage_path: Option<PathBuf>,
    catalog_dir: Option<PathBuf>,
    log_filter: Option<String>,
    inbound_capacity: Option<usize>,
    rpc_timeout_ms: Option<u64>,
}

/// Defaults, then the config file (when present), then environment
/// variables. A missing file is fine; a malformed one is an error.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileConfig = toml::from_str(raw)?;
    if let Some(v) = file_cfg.resource_name {
        settings.resource_name = Some(v);
    }
    if let Some(v) = file_cfg.base_url {
        settings.base_url = Some(v);
    }
    if let Some(v) = file_cfg.storage_path {
        settings.storage_path = v;
    }
    if let Some(v) = file_cfg.catalog_dir {
        settings.catalog_dir = Some(v);
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.inbound_capacity {
        settings.inbound_capacity = v;
    }
    if let Some(v) = file_cfg.rpc_timeout_ms {
        settings.rpc_timeout_ms = Some(v);
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |short: &str, app: &str| lookup(app).or_else(|| lookup(short));

    if let Some(v) = var("NUI_RESOURCE_NAME", "APP__RESOURCE_NAME") {
        settings.resource_name = Some(v);
    }
    if let Some(v) = var("NUI_BASE_URL", "APP__BASE_URL") {
        settings.base_url = Some(v);
    }
    if let Some(v) = var("NUI_STORAGE_PATH", "APP__STORAGE_PATH") {
        settings.storage_path = PathBuf::from(v);
    }
    if let Some(v) = var("NUI_CATALOG_DIR", "APP__CATALOG_DIR") {
        settings.catalog_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = var("NUI_LOG", "APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(parsed) = var("NUI_INBOUND_CAPACITY", "APP__INBOUND_CAPACITY")
        .and_then(|v| v.parse::<usize>().ok())
    {
        settings.inbound_capacity = parsed;
    }
    if let Some(parsed) = var("NUI_RPC_TIMEOUT_MS", "APP__RPC_TIMEOUT_MS")
        .and_then(|v| v.parse::<u64>().ok())
    {
        settings.rpc_timeout_ms = Some(parsed);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
