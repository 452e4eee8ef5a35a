use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Which backend holds the hand-off records
    pub backend: StoreBackend,

    /// Data directory for the file backend
    pub data_dir: String,

    /// How long an unread record stays retrievable (default: 24 hours)
    pub ttl_secs: u64,

    /// How often the sweep task runs (default: hourly)
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    File,
}

impl Config {
    /// Loads defaults, then the config file (optional), then
    /// `VOICE_HANDOFF__*` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "voice-handoff")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8080)?
            .set_default("store.backend", "memory")?
            .set_default("store.data_dir", "data")?
            .set_default("store.ttl_secs", 86_400)?
            .set_default("store.sweep_interval_secs", 3_600)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("VOICE_HANDOFF")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
