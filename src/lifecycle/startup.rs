//! Startup orchestration.
//!
//! # Phases
//! ```text
//! Init → PragmasComputed → InterruptBridgeArmed → OptionsAssembled
//!      → ClusterIdResolved → Constructed → Running → Terminated
//!
//! any fatal step ──▶ Aborted
//! ```
//!
//! # Design Decisions
//! - Fail fast: bad pragmas abort before any resource is allocated
//! - The interrupt channel exists before the server does
//! - The identity store is injected so tests can swap in a fake

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::{IdentityConfig, LauncherConfig};
use crate::identity::{resolve_cluster_id, PropertyStore, StoreError};
use crate::lifecycle::interrupt::{self, InterruptReceiver};
use crate::pragma::{parse_pragmas, PragmaError, PragmaMap};
use crate::server::{BaseConfig, Persistence, Server, ServerError, ServerFactory, ServerOptions, UiConfig};

/// Process lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    PragmasComputed,
    InterruptBridgeArmed,
    OptionsAssembled,
    ClusterIdResolved,
    Constructed,
    Running,
    Terminated,
    Aborted,
}

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid bind ip {0:?}")]
    InvalidIp(String),

    #[error(transparent)]
    Pragma(#[from] PragmaError),

    #[error("failed to construct server: {0}")]
    Construct(#[source] ServerError),

    #[error("server failed: {0}")]
    Start(#[source] ServerError),
}

impl BootstrapError {
    /// Last phase reached before the abort.
    pub fn phase(&self) -> Phase {
        match self {
            BootstrapError::InvalidIp(_) | BootstrapError::Pragma(_) => Phase::Init,
            BootstrapError::Construct(_) => Phase::ClusterIdResolved,
            BootstrapError::Start(_) => Phase::Running,
        }
    }
}

/// Drives one server from configuration to termination.
pub struct Bootstrap<F> {
    config: LauncherConfig,
    factory: F,
    cancel: Option<CancellationToken>,
}

impl<F: ServerFactory> Bootstrap<F> {
    pub fn new(config: LauncherConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            cancel: None,
        }
    }

    /// Use `token` as the shutdown source instead of OS signals.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run the full startup sequence and block until the server terminates.
    ///
    /// `open_store` is only called when cluster identity is enabled.
    pub async fn run<S, O>(self, open_store: O) -> Result<(), BootstrapError>
    where
        S: PropertyStore,
        O: FnOnce(&IdentityConfig) -> Result<S, StoreError>,
    {
        let Bootstrap {
            config,
            factory,
            cancel,
        } = self;

        let ip: IpAddr = config
            .frontend
            .ip
            .parse()
            .map_err(|_| BootstrapError::InvalidIp(config.frontend.ip.clone()))?;
        tracing::info!(
            ip = %ip,
            frontend_port = config.frontend.port,
            ui_port = config.ui.port,
            http_port = config.frontend.http_port,
            metrics_port = config.frontend.metrics_port,
            "Starting dev server"
        );

        let pragmas = parse_pragmas(&config.persistence.sqlite_pragmas)?;
        enter(Phase::PragmasComputed);

        // Detached: the bridge lives as long as the process.
        let (_bridge, interrupt) = interrupt::arm(cancel);
        enter(Phase::InterruptBridgeArmed);

        let mut options = assemble_options(&config, ip, pragmas, interrupt);
        enter(Phase::OptionsAssembled);

        let identity = &config.cluster_identity;
        if identity.enabled {
            options.cluster_id = resolve_cluster_id(open_store(identity), &identity.env, &identity.key);
        }
        enter(Phase::ClusterIdResolved);

        let server = factory.build(options).map_err(BootstrapError::Construct)?;
        enter(Phase::Constructed);

        enter(Phase::Running);
        server.start().await.map_err(BootstrapError::Start)?;
        enter(Phase::Terminated);
        Ok(())
    }
}

fn enter(phase: Phase) {
    tracing::debug!(phase = ?phase, "Bootstrap phase");
}

/// Build the option set handed to the server factory.
pub fn assemble_options(
    config: &LauncherConfig,
    ip: IpAddr,
    pragmas: PragmaMap,
    interrupt: InterruptReceiver,
) -> ServerOptions {
    let frontend_address = SocketAddr::new(ip, config.frontend.port).to_string();

    let ui = config.ui.enabled.then(|| UiConfig {
        host: ip,
        port: config.ui.port,
        upstream_address: frontend_address,
        enable_ui: true,
        enable_openapi: config.ui.enable_openapi,
    });

    let persistence = match &config.persistence.db_filename {
        Some(path) => Persistence::File(PathBuf::from(path)),
        None => Persistence::Disabled,
    };

    ServerOptions {
        dynamic_ports: config.frontend.dynamic_ports,
        frontend_ip: ip,
        frontend_port: config.frontend.port,
        frontend_http_port: config.frontend.http_port,
        metrics_port: config.frontend.metrics_port,
        namespaces: config.namespaces.clone(),
        sqlite_pragmas: pragmas,
        interrupt: Some(interrupt),
        base_config: BaseConfig::default(),
        persistence,
        ui,
        cluster_id: None,
    }
}
