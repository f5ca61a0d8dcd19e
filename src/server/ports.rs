//! Port resolution and listener binding.
//!
//! # Responsibilities
//! - Resolve unset ports to free ones when dynamic ports are enabled
//! - Reject port collisions between services
//! - Bind TCP listeners, tagging errors with the service they belong to

use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;

use crate::server::error::{Service, ServerError};

/// Ask the OS for a currently free port on `ip`.
pub fn allocate_free_port(ip: IpAddr) -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind((ip, 0))?;
    Ok(listener.local_addr()?.port())
}

/// Return `requested`, or a free port when it is 0 and `dynamic` is set.
pub fn resolve_port(
    service: Service,
    ip: IpAddr,
    requested: u16,
    dynamic: bool,
) -> Result<u16, ServerError> {
    match (requested, dynamic) {
        (0, true) => {
            let port = allocate_free_port(ip)
                .map_err(|source| ServerError::PortAllocation { service, source })?;
            tracing::debug!(%service, port, "Allocated dynamic port");
            Ok(port)
        }
        (0, false) => Err(ServerError::PortRequired(service)),
        (port, _) => Ok(port),
    }
}

/// Every pair of enabled entries sharing a port, as `(port, first, second)`.
/// Port 0 means disabled. Each entry is paired with the next entry on its port.
pub fn find_conflicts<T: Copy>(ports: &[(T, u16)]) -> Vec<(u16, T, T)> {
    ports
        .iter()
        .enumerate()
        .filter(|(_, (_, port))| *port != 0)
        .filter_map(|(i, (first, port))| {
            ports[i + 1..]
                .iter()
                .find(|(_, other)| other == port)
                .map(|(second, _)| (*port, *first, *second))
        })
        .collect()
}

/// Fail on the first pair of enabled services sharing a port.
pub fn check_conflicts(ports: &[(Service, u16)]) -> Result<(), ServerError> {
    match find_conflicts(ports).first() {
        Some(&(port, first, second)) => Err(ServerError::PortConflict { port, first, second }),
        None => Ok(()),
    }
}

/// Bind a listener for `service`.
pub async fn bind(service: Service, addr: SocketAddr) -> Result<TcpListener, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            service,
            addr,
            source,
        })?;

    tracing::info!(
        %service,
        address = %addr,
        "Listener bound"
    );
    Ok(listener)
}
