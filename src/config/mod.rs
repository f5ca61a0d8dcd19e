//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (main.rs)
//!     → LauncherConfig (validated, immutable)
//!     → handed to the bootstrap sequence
//! ```
//!
//! # Design Decisions
//! - Every field has a default; the defaults are the fixed dev topology
//! - Config is read once per process start, there is no reload
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    FrontendConfig, IdentityConfig, LauncherConfig, LogFormat, LoggingConfig, PersistenceConfig,
    UiSettings,
};
pub use validation::{validate_config, ValidationError};
