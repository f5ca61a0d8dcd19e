//! Server option set.
//!
//! Everything the server constructor consumes, as named, typed fields.
//! Two pairs of fields can describe the same thing; the explicit field wins
//! over [`BaseConfig`]:
//! - `ui` over `base_config.ui`
//! - `cluster_id` over `base_config.cluster_id`

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::Serialize;

use crate::lifecycle::InterruptReceiver;
use crate::pragma::PragmaMap;

/// Configuration of the embedded UI sub-service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiConfig {
    /// Bind host.
    pub host: IpAddr,
    /// Bind port (0 = pick one when dynamic ports are on).
    pub port: u16,
    /// Front-end address the UI talks to.
    pub upstream_address: String,
    pub enable_ui: bool,
    pub enable_openapi: bool,
}

impl UiConfig {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Baseline server configuration, overridden by explicit options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseConfig {
    pub cluster_id: Option<String>,
    pub ui: Option<UiConfig>,
}

/// Where workflow state lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Persistence {
    /// In-memory only; everything is lost on exit.
    #[default]
    Disabled,
    /// SQLite database file.
    File(PathBuf),
}

impl Persistence {
    /// Human-readable description for status endpoints and logs.
    pub fn describe(&self) -> String {
        match self {
            Persistence::Disabled => "in-memory".to_string(),
            Persistence::File(path) => path.display().to_string(),
        }
    }
}

/// Options consumed once by [`ServerFactory::build`](super::ServerFactory::build).
///
/// Defaults: front-end `0.0.0.0:7233`, HTTP and metrics disabled, namespace
/// `default`, no pragmas, in-memory persistence, no UI, no interrupt channel
/// (the server then listens for OS signals itself).
#[derive(Debug)]
pub struct ServerOptions {
    /// Resolve unset (0) front-end and UI ports to free ports.
    pub dynamic_ports: bool,
    pub frontend_ip: IpAddr,
    pub frontend_port: u16,
    /// HTTP gateway port, 0 = disabled.
    pub frontend_http_port: u16,
    /// Prometheus exporter port, 0 = disabled.
    pub metrics_port: u16,
    pub namespaces: Vec<String>,
    pub sqlite_pragmas: PragmaMap,
    /// Shutdown trigger.
    pub interrupt: Option<InterruptReceiver>,
    pub base_config: BaseConfig,
    pub persistence: Persistence,
    pub ui: Option<UiConfig>,
    pub cluster_id: Option<String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            dynamic_ports: false,
            frontend_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            frontend_port: 7233,
            frontend_http_port: 0,
            metrics_port: 0,
            namespaces: vec!["default".to_string()],
            sqlite_pragmas: PragmaMap::new(),
            interrupt: None,
            base_config: BaseConfig::default(),
            persistence: Persistence::Disabled,
            ui: None,
            cluster_id: None,
        }
    }
}

impl ServerOptions {
    /// UI configuration after applying the override order.
    pub fn effective_ui(&self) -> Option<&UiConfig> {
        self.ui.as_ref().or(self.base_config.ui.as_ref())
    }

    /// Cluster id after applying the override order.
    pub fn effective_cluster_id(&self) -> Option<&str> {
        self.cluster_id
            .as_deref()
            .or(self.base_config.cluster_id.as_deref())
    }

    /// Front-end socket address as requested (port may still be 0).
    pub fn frontend_address(&self) -> SocketAddr {
        SocketAddr::new(self.frontend_ip, self.frontend_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui(port: u16) -> UiConfig {
        UiConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port,
            upstream_address: "127.0.0.1:7233".into(),
            enable_ui: true,
            enable_openapi: false,
        }
    }

    #[test]
    fn explicit_ui_overrides_base_config() {
        let mut options = ServerOptions {
            base_config: BaseConfig {
                ui: Some(ui(1000)),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(options.effective_ui().map(|u| u.port), Some(1000));

        options.ui = Some(ui(2000));
        assert_eq!(options.effective_ui().map(|u| u.port), Some(2000));
    }

    #[test]
    fn explicit_cluster_id_overrides_base_config() {
        let mut options = ServerOptions::default();
        assert_eq!(options.effective_cluster_id(), None);

        options.base_config.cluster_id = Some("base".into());
        assert_eq!(options.effective_cluster_id(), Some("base"));

        options.cluster_id = Some("explicit".into());
        assert_eq!(options.effective_cluster_id(), Some("explicit"));
    }

    #[test]
    fn defaults_describe_dev_topology() {
        let options = ServerOptions::default();
        assert_eq!(options.frontend_address().to_string(), "0.0.0.0:7233");
        assert_eq!(options.persistence.describe(), "in-memory");
        assert!(options.effective_ui().is_none());
    }
}
