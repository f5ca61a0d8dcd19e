use std::path::PathBuf;

use clap::Parser;

use workflow_devserver::config::{load_config, validate_config, ConfigError, LauncherConfig, LogFormat};
use workflow_devserver::identity::FileStore;
use workflow_devserver::lifecycle::{Bootstrap, Phase};
use workflow_devserver::observability::init_logging;
use workflow_devserver::server::EmbeddedServerFactory;

#[derive(Parser, Debug)]
#[command(name = "workflow-devserver", version)]
#[command(about = "Launch a local workflow orchestration dev server", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// IP address every service binds to
    #[arg(long)]
    ip: Option<String>,

    /// Front-end port
    #[arg(short, long)]
    port: Option<u16>,

    /// UI port
    #[arg(long)]
    ui_port: Option<u16>,

    /// HTTP gateway port (0 disables)
    #[arg(long)]
    http_port: Option<u16>,

    /// Prometheus metrics port (0 disables)
    #[arg(long)]
    metrics_port: Option<u16>,

    /// Additional namespace to enable (repeatable)
    #[arg(short, long = "namespace")]
    namespaces: Vec<String>,

    /// SQLite pragma in KEY=VALUE form (repeatable)
    #[arg(long = "sqlite-pragma")]
    sqlite_pragmas: Vec<String>,

    /// Persist to this SQLite file instead of memory
    #[arg(short = 'f', long)]
    db_filename: Option<String>,

    /// Do not start the UI
    #[arg(long)]
    headless: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format (pretty or json)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn apply(self, config: &mut LauncherConfig) {
        if let Some(ip) = self.ip {
            config.frontend.ip = ip;
        }
        if let Some(port) = self.port {
            config.frontend.port = port;
        }
        if let Some(port) = self.ui_port {
            config.ui.port = port;
        }
        if let Some(port) = self.http_port {
            config.frontend.http_port = port;
        }
        if let Some(port) = self.metrics_port {
            config.frontend.metrics_port = port;
        }
        for namespace in self.namespaces {
            if !config.namespaces.contains(&namespace) {
                config.namespaces.push(namespace);
            }
        }
        config.persistence.sqlite_pragmas.extend(self.sqlite_pragmas);
        if self.db_filename.is_some() {
            config.persistence.db_filename = self.db_filename;
        }
        if self.headless {
            config.ui.enabled = false;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LauncherConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.logging)?;
    tracing::info!("workflow-devserver v{} starting", env!("CARGO_PKG_VERSION"));

    let bootstrap = Bootstrap::new(config, EmbeddedServerFactory);
    if let Err(err) = bootstrap
        .run(|identity| FileStore::open(&identity.namespace, &identity.filename))
        .await
    {
        tracing::error!(
            phase = ?Phase::Aborted,
            last_phase = ?err.phase(),
            error = %err,
            "Startup aborted"
        );
        return Err(err.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
