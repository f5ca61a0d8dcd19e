//! Server subsystem.
//!
//! # Data Flow
//! ```text
//! ServerOptions (options.rs)
//!     → ServerFactory::build (contract.rs)
//!     → Server::start, blocking until interrupt or fault
//!
//! EmbeddedServer (embedded.rs):
//!     front-end listener ─┐
//!     HTTP gateway (opt) ─┼─ frontend.rs routes + layers.rs middleware
//!     UI listener (opt) ──── ui.rs routes + layers.rs middleware
//!     metrics (opt) ──────── Prometheus exporter
//! ```
//!
//! # Design Decisions
//! - The bootstrap sequence only depends on the contract, never on the
//!   embedded implementation
//! - Construction validates and resolves ports; nothing is bound until start

pub mod contract;
pub mod embedded;
pub mod error;
pub mod frontend;
pub mod layers;
pub mod options;
pub mod ports;
pub mod ui;

pub use contract::{Server, ServerFactory};
pub use embedded::{EmbeddedServer, EmbeddedServerFactory};
pub use error::{Service, ServerError};
pub use frontend::ClusterInfo;
pub use options::{BaseConfig, Persistence, ServerOptions, UiConfig};
