//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the launcher.
//! All types derive Serde traits for deserialization from config files, and
//! every default matches the fixed development topology: front-end on
//! `0.0.0.0:7233`, UI on port 8088, HTTP and metrics disabled.

use serde::{Deserialize, Serialize};

/// Root configuration for the dev server launcher.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LauncherConfig {
    /// Front-end bind address and ports.
    pub frontend: FrontendConfig,

    /// Embedded UI settings.
    pub ui: UiSettings,

    /// Namespaces enabled at startup.
    pub namespaces: Vec<String>,

    /// Persistence mode and SQLite tuning.
    pub persistence: PersistenceConfig,

    /// Where the cluster id is persisted.
    pub cluster_identity: IdentityConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            frontend: FrontendConfig::default(),
            ui: UiSettings::default(),
            namespaces: vec!["default".to_string()],
            persistence: PersistenceConfig::default(),
            cluster_identity: IdentityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Front-end listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FrontendConfig {
    /// Bind IP shared by every service (e.g., "0.0.0.0").
    pub ip: String,

    /// Front-end service port.
    pub port: u16,

    /// HTTP gateway port (0 = disabled).
    pub http_port: u16,

    /// Prometheus metrics port (0 = disabled).
    pub metrics_port: u16,

    /// Resolve unset (0) service ports to free ports at construction.
    pub dynamic_ports: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            ip: "0.0.0.0".to_string(),
            port: 7233,
            http_port: 0,
            metrics_port: 0,
            dynamic_ports: true,
        }
    }
}

/// Embedded UI configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    /// Run the UI sub-service at all (`false` = headless).
    pub enabled: bool,

    /// UI port.
    pub port: u16,

    /// Advertise the OpenAPI surface.
    pub enable_openapi: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8088,
            enable_openapi: true,
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct PersistenceConfig {
    /// SQLite database file. `None` keeps persistence disabled (in-memory).
    pub db_filename: Option<String>,

    /// Raw `KEY=VALUE` pragma statements.
    pub sqlite_pragmas: Vec<String>,
}

/// Location of the persisted cluster id.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IdentityConfig {
    /// Resolve and supply a persisted cluster id.
    pub enabled: bool,

    /// Store namespace (directory under the user config dir).
    pub namespace: String,

    /// Store file name.
    pub filename: String,

    /// Environment section inside the store.
    pub env: String,

    /// Property key holding the cluster id.
    pub key: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: "temporalio".to_string(),
            filename: "version-info".to_string(),
            env: "default".to_string(),
            key: "cluster-id".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {other:?}, expected pretty or json")),
        }
    }
}
