//! In-process server implementing the construct-and-start contract.
//!
//! # Construction
//! ```text
//! ServerOptions
//!     → namespace / pragma / persistence checks
//!     → dynamic port resolution (front-end, UI)
//!     → port collision check
//!     → cluster id (explicit → base config → fresh UUID)
//!     → EmbeddedServer (nothing bound yet)
//! ```
//!
//! # Runtime
//! ```text
//! start(): install metrics exporter → bind all listeners → serve
//!     interrupt fires      → broadcast shutdown → drain → Ok
//!     a listener fails     → broadcast shutdown → drain → Err
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinSet};
use uuid::Uuid;

use crate::lifecycle::{signals, InterruptCause, InterruptReceiver, Shutdown};
use crate::observability::metrics;
use crate::server::contract::{Server, ServerFactory};
use crate::server::error::{Service, ServerError};
use crate::server::frontend::{self, ClusterInfo};
use crate::server::options::{Persistence, ServerOptions, UiConfig};
use crate::server::ports;
use crate::server::ui;

/// Pragmas the SQLite persistence layer accepts.
pub const SUPPORTED_PRAGMAS: [&str; 2] = ["journal_mode", "synchronous"];

/// Factory for [`EmbeddedServer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedServerFactory;

/// A validated server whose listeners are bound on [`Server::start`].
#[derive(Debug)]
pub struct EmbeddedServer {
    frontend_addr: SocketAddr,
    http_addr: Option<SocketAddr>,
    metrics_addr: Option<SocketAddr>,
    ui: Option<UiConfig>,
    info: Arc<ClusterInfo>,
    interrupt: Option<InterruptReceiver>,
}

impl ServerFactory for EmbeddedServerFactory {
    type Server = EmbeddedServer;

    fn build(&self, options: ServerOptions) -> Result<EmbeddedServer, ServerError> {
        check_namespaces(&options.namespaces)?;

        if let Some(key) = options
            .sqlite_pragmas
            .keys()
            .find(|key| !SUPPORTED_PRAGMAS.contains(&key.as_str()))
        {
            return Err(ServerError::UnsupportedPragma(key.clone()));
        }

        if let Persistence::File(path) = &options.persistence {
            let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
            if let Some(dir) = parent {
                if !dir.is_dir() {
                    return Err(ServerError::MissingDatabaseDir(dir.to_path_buf()));
                }
            }
        }

        let ip = options.frontend_ip;
        let frontend_port =
            ports::resolve_port(Service::Frontend, ip, options.frontend_port, options.dynamic_ports)?;
        let frontend_addr = SocketAddr::new(ip, frontend_port);

        let ui = match options.effective_ui().cloned() {
            Some(mut ui) => {
                ui.port = ports::resolve_port(Service::Ui, ui.host, ui.port, options.dynamic_ports)?;
                if options.frontend_port == 0 {
                    // The upstream was assembled before the front-end port was known.
                    ui.upstream_address = frontend_addr.to_string();
                }
                Some(ui)
            }
            None => None,
        };

        ports::check_conflicts(&[
            (Service::Frontend, frontend_port),
            (Service::FrontendHttp, options.frontend_http_port),
            (Service::Metrics, options.metrics_port),
            (Service::Ui, ui.as_ref().map_or(0, |ui| ui.port)),
        ])?;

        let cluster_id = options
            .effective_cluster_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::info!(
            frontend = %frontend_addr,
            ui = ?ui.as_ref().map(UiConfig::address),
            cluster_id = %cluster_id,
            persistence = %options.persistence.describe(),
            namespaces = ?options.namespaces,
            "Server constructed"
        );

        let info = ClusterInfo {
            cluster_id,
            server_version: env!("CARGO_PKG_VERSION"),
            persistence: options.persistence.describe(),
            sqlite_pragmas: options.sqlite_pragmas,
            namespaces: options.namespaces,
        };

        Ok(EmbeddedServer {
            frontend_addr,
            http_addr: enabled(ip, options.frontend_http_port),
            metrics_addr: enabled(ip, options.metrics_port),
            ui,
            info: Arc::new(info),
            interrupt: options.interrupt,
        })
    }
}

fn enabled(ip: std::net::IpAddr, port: u16) -> Option<SocketAddr> {
    (port != 0).then(|| SocketAddr::new(ip, port))
}

fn check_namespaces(namespaces: &[String]) -> Result<(), ServerError> {
    if namespaces.is_empty() {
        return Err(ServerError::NoNamespaces);
    }
    let mut seen = HashSet::new();
    for name in namespaces {
        if name.trim().is_empty() {
            return Err(ServerError::InvalidNamespace(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(ServerError::DuplicateNamespace(name.clone()));
        }
    }
    Ok(())
}

impl EmbeddedServer {
    /// Front-end address, with any dynamic port already resolved.
    pub fn frontend_addr(&self) -> SocketAddr {
        self.frontend_addr
    }

    /// HTTP gateway address, if enabled.
    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http_addr
    }

    /// UI address, if the UI sub-service is configured.
    pub fn ui_addr(&self) -> Option<SocketAddr> {
        self.ui.as_ref().map(UiConfig::address)
    }

    pub fn cluster_info(&self) -> &ClusterInfo {
        &self.info
    }
}

impl Server for EmbeddedServer {
    async fn start(self) -> Result<(), ServerError> {
        let EmbeddedServer {
            frontend_addr,
            http_addr,
            metrics_addr,
            ui,
            info,
            interrupt,
        } = self;

        if let Some(addr) = metrics_addr {
            metrics::install_exporter(addr).map_err(|e| ServerError::Metrics(e.to_string()))?;
            metrics::record_namespaces(info.namespaces.len());
        }

        let shutdown = Shutdown::new();
        let mut tasks = JoinSet::new();

        let listener = ports::bind(Service::Frontend, frontend_addr).await?;
        let router = frontend::router(Service::Frontend, info.clone());
        tasks.spawn(serve(Service::Frontend, listener, router, shutdown.signal()));

        if let Some(addr) = http_addr {
            let listener = ports::bind(Service::FrontendHttp, addr).await?;
            let router = frontend::router(Service::FrontendHttp, info.clone());
            tasks.spawn(serve(Service::FrontendHttp, listener, router, shutdown.signal()));
        }

        if let Some(ui_config) = ui {
            let listener = ports::bind(Service::Ui, ui_config.address()).await?;
            tasks.spawn(serve(Service::Ui, listener, ui::router(ui_config), shutdown.signal()));
        }

        tracing::info!(cluster_id = %info.cluster_id, "Server started");

        let mut result = tokio::select! {
            cause = wait_for_interrupt(interrupt) => {
                tracing::info!(cause = ?cause, "Stopping server");
                Ok(())
            }
            Some(joined) = tasks.join_next() => {
                let result = flatten(joined);
                if let Err(e) = &result {
                    tracing::error!(error = %e, "Listener failed, stopping server");
                }
                result
            }
        };

        shutdown.trigger();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = flatten(joined) {
                tracing::error!(error = %e, "Listener failed during shutdown");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        tracing::info!("Server stopped");
        result
    }
}

async fn wait_for_interrupt(interrupt: Option<InterruptReceiver>) -> InterruptCause {
    if let Some(rx) = interrupt {
        match rx.await {
            Ok(cause) => return cause,
            Err(_) => {
                tracing::warn!("Interrupt channel closed without a signal, falling back to OS signals")
            }
        }
    }
    InterruptCause::Signal(signals::wait_for_os_interrupt().await)
}

async fn serve(
    service: Service,
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|source| ServerError::Serve { service, source })?;

    tracing::info!(%service, "Listener stopped");
    Ok(())
}

fn flatten(joined: Result<Result<(), ServerError>, JoinError>) -> Result<(), ServerError> {
    joined.map_err(ServerError::Task).and_then(|result| result)
}
