//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bootstrap + server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (when a metrics port is set)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every HTTP response (`x-request-id`)
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
