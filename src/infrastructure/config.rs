use crate::domain::favicon::FRESHNESS_WINDOW_MS;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub assets: AssetSettings,
    pub favicon: FaviconSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Whole document kept in a file on this machine
    Local,
    /// Whole document exchanged with another persistence service
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub remote_url: Option<String>,
}

impl StorageSettings {
    pub fn remote_endpoint(&self) -> anyhow::Result<&str> {
        self.remote_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("storage.remote_url is required for the remote backend"))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetSettings {
    pub static_dir: PathBuf,
    pub wallpaper_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FaviconSettings {
    pub ttl_ms: i64,
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/homepage")
}

/// Defaults, then the optional config file `name`, then `HOMEPAGE_*` environment variables
/// (`HOMEPAGE_SERVER__PORT=9000`).
pub fn load_app_config_from(name: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8003_i64)?
        .set_default("storage.backend", "local")?
        .set_default("storage.data_dir", default_data_dir())?
        .set_default("assets.static_dir", "static")?
        .set_default("assets.wallpaper_path", "/tmp/wp.png")?
        .set_default("favicon.ttl_ms", FRESHNESS_WINDOW_MS)?
        .add_source(config::File::with_name(name).required(false))
        .add_source(
            config::Environment::with_prefix("HOMEPAGE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("homepage")
        .to_string_lossy()
        .into_owned()
}
