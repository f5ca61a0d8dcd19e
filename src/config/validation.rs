//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the bind IP and namespace list
//! - Detect port collisions between enabled services
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LauncherConfig → Result<(), Vec<ValidationError>>
//! - Pragma syntax is left to the bootstrap sequence, which treats it as fatal

use std::collections::HashSet;
use std::net::IpAddr;

use thiserror::Error;

use crate::config::schema::LauncherConfig;
use crate::server::ports;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind ip {0:?}")]
    InvalidIp(String),

    #[error("at least one namespace must be enabled")]
    NoNamespaces,

    #[error("namespace names must not be empty")]
    EmptyNamespace,

    #[error("namespace {0:?} is listed more than once")]
    DuplicateNamespace(String),

    #[error("port {port} is used by both {first} and {second}")]
    PortConflict {
        port: u16,
        first: &'static str,
        second: &'static str,
    },

    #[error("front-end port must be set when dynamic ports are disabled")]
    FrontendPortRequired,

    #[error("cluster identity {0} must not be empty")]
    EmptyIdentityField(&'static str),

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &LauncherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.frontend.ip.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidIp(config.frontend.ip.clone()));
    }

    if config.namespaces.is_empty() {
        errors.push(ValidationError::NoNamespaces);
    }
    let mut seen = HashSet::new();
    for namespace in &config.namespaces {
        if namespace.trim().is_empty() {
            errors.push(ValidationError::EmptyNamespace);
        } else if !seen.insert(namespace.as_str()) {
            errors.push(ValidationError::DuplicateNamespace(namespace.clone()));
        }
    }

    if config.frontend.port == 0 && !config.frontend.dynamic_ports {
        errors.push(ValidationError::FrontendPortRequired);
    }

    let mut service_ports: Vec<(&'static str, u16)> = vec![
        ("frontend", config.frontend.port),
        ("frontend http", config.frontend.http_port),
        ("metrics", config.frontend.metrics_port),
    ];
    if config.ui.enabled {
        service_ports.push(("ui", config.ui.port));
    }
    errors.extend(
        ports::find_conflicts(&service_ports)
            .into_iter()
            .map(|(port, first, second)| ValidationError::PortConflict { port, first, second }),
    );

    let identity = &config.cluster_identity;
    if identity.enabled {
        for (field, value) in [
            ("namespace", &identity.namespace),
            ("filename", &identity.filename),
            ("env", &identity.env),
            ("key", &identity.key),
        ] {
            if value.is_empty() {
                errors.push(ValidationError::EmptyIdentityField(field));
            }
        }
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.logging.level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
