//! Client configuration: a TOML file, one environment override, CLI flags.

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::docs::registry::POLL_INTERVAL;
use crate::docs::validate::{UploadPolicy, MAX_UPLOAD_BYTES};
use crate::notify::NOTIFICATION_TTL;

/// Overrides `server.base_url`.
pub const SERVER_URL_ENV: &str = "DOCASK_SERVER_URL";

const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServerConfig {
    /// Root URL of the ingestion server
    pub base_url: String,
    /// Upper bound on any single request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClientConfig {
    /// How often the file table is refreshed, in milliseconds
    pub poll_interval_ms: u64,
    /// How long a notification stays visible, in milliseconds
    pub notification_ttl_ms: u64,
    /// Largest file the client will try to upload, in bytes
    pub max_upload_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL.as_millis() as u64,
            notification_ttl_ms: NOTIFICATION_TTL.as_millis() as u64,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Load from `path` (or the platform default), then apply
    /// `DOCASK_SERVER_URL` and finally `server_override`.
    pub fn load(path: Option<&Path>, server_override: Option<&str>) -> Result<Self> {
        let env_url = std::env::var(SERVER_URL_ENV).ok();
        Self::load_with(path, env_url.as_deref(), server_override)
    }

    /// [`Config::load`] with the environment value passed in. A blank value is ignored.
    pub fn load_with(
        path: Option<&Path>,
        env_url: Option<&str>,
        server_override: Option<&str>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
                Self::from_file(&expanded)?
            }
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Some(url) = env_url.map(str::trim).filter(|url| !url.is_empty()) {
            config.server.base_url = url.to_string();
        }
        if let Some(url) = server_override {
            config.server.base_url = url.to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse TOML")
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.server.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("server.base_url must start with http:// or https://, got \"{url}\"");
        }
        if self.server.request_timeout_secs == 0 {
            bail!("server.request_timeout_secs must be greater than zero");
        }
        if self.client.poll_interval_ms == 0 {
            bail!("client.poll_interval_ms must be greater than zero");
        }
        if self.client.notification_ttl_ms == 0 {
            bail!("client.notification_ttl_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn json_schema() -> Result<String> {
        serde_json::to_string_pretty(&schemars::schema_for!(Config))
            .context("Failed to serialize config schema")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.client.poll_interval_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.client.notification_ttl_ms)
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: self.client.max_upload_bytes,
        }
    }
}

/// `<platform config dir>/config.toml`, if a home directory can be resolved.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "docask", "docask").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}
