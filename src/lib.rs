//! Workflow orchestration dev server launcher.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI flags ──┐
//!   TOML file ──┴─▶ config ──▶ lifecycle::startup (Bootstrap)
//!                                   │
//!                   ┌───────────────┼──────────────────────┐
//!                   ▼               ▼                      ▼
//!                pragma      lifecycle::interrupt      identity
//!              KEY=VALUE     token / SIGINT bridge    cluster id store
//!                   │               │                      │
//!                   └───────▶ server::ServerOptions ◀──────┘
//!                                   │
//!                                   ▼
//!                     ServerFactory::build → Server::start
//!                     (server::embedded: front-end, UI, metrics)
//! ```

// Startup
pub mod config;
pub mod lifecycle;
pub mod pragma;

// Server contract and embedded implementation
pub mod identity;
pub mod server;

// Cross-cutting concerns
pub mod observability;

pub use config::LauncherConfig;
pub use lifecycle::{Bootstrap, BootstrapError};
pub use server::{EmbeddedServerFactory, ServerOptions};
