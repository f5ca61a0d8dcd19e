//! Server construction and runtime errors.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// A network-facing service hosted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Frontend,
    FrontendHttp,
    Metrics,
    Ui,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Frontend => "frontend",
            Service::FrontendHttp => "frontend-http",
            Service::Metrics => "metrics",
            Service::Ui => "ui",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`ServerFactory::build`](super::ServerFactory::build)
/// and [`Server::start`](super::Server::start).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("at least one namespace must be enabled")]
    NoNamespaces,

    #[error("invalid namespace name {0:?}")]
    InvalidNamespace(String),

    #[error("namespace {0:?} is enabled more than once")]
    DuplicateNamespace(String),

    #[error("unsupported sqlite pragma {0:?}")]
    UnsupportedPragma(String),

    #[error("{0} port must be set when dynamic ports are disabled")]
    PortRequired(Service),

    #[error("port {port} is assigned to both {first} and {second}")]
    PortConflict {
        port: u16,
        first: Service,
        second: Service,
    },

    #[error("database directory {} does not exist", .0.display())]
    MissingDatabaseDir(PathBuf),

    #[error("failed to allocate a port for {service}: {source}")]
    PortAllocation {
        service: Service,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {service} on {addr}: {source}")]
    Bind {
        service: Service,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install metrics exporter: {0}")]
    Metrics(String),

    #[error("{service} stopped unexpectedly: {source}")]
    Serve {
        service: Service,
        #[source]
        source: std::io::Error,
    },

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
