//! Runtime configuration.
//!
//! Loaded from a YAML file; every field has a default so an empty or
//! missing file yields a working setup. `LISTEN` overrides the bind address.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::connection::READ_CHUNK;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HOMECONTROL_CONFIG";

/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

const DEFAULT_CONFIG_PATH: &str = "homecontrol.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub wifi: WifiConfig,
    pub sensor: SensorConfig,
    pub logging: LoggingConfig,
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Connections allowed open at once.
    pub max_connections: usize,
    /// Largest payload accepted in a single receive event. The default is
    /// the read size, so only a stricter setting rejects anything.
    pub max_request_bytes: usize,
    /// Close connections that send nothing for this long. Responding never
    /// closes a connection, so this is what frees slots under the cap.
    pub idle_timeout_ms: u64,
    /// Answer unknown paths with 404 and garbage with 400.
    pub strict_paths: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:80".to_string(),
            max_connections: 8,
            max_request_bytes: READ_CHUNK,
            idle_timeout_ms: 30_000,
            strict_paths: false,
        }
    }
}

impl ServerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
    pub connect_timeout_ms: u64,
    pub retry_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            connect_timeout_ms: 20_000,
            retry_delay_ms: 100,
            max_attempts: 5,
        }
    }
}

impl WifiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Raw count returned by the simulated converter.
    pub simulated_raw: u16,
}

impl Default for SensorConfig {
    fn default() -> Self {
        // ~27 °C
        Self { simulated_raw: 876 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> anyhow::Result<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid log level {:?}", self.level))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    pub period_ms: u64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self { period_ms: 1000 }
    }
}

impl TasksConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms.max(1))
    }
}

impl Config {
    /// Loads configuration using the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration, resolving environment variables through `env`.
    pub fn load_with<F>(env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = env(CONFIG_ENV).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::from_file(&path)?;

        if let Some(listen_addr) = env(LISTEN_ENV) {
            cfg.server.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    /// Reads a YAML file. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(&text)
                .with_context(|| format!("parsing config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("reading config file {}", path.display())),
        }
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
