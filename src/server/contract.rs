//! Construct-and-start contract between the bootstrap sequence and a server.

use std::future::Future;

use crate::server::error::ServerError;
use crate::server::options::ServerOptions;

/// A constructed, not yet started server.
pub trait Server: Send {
    /// Start serving and resolve when the server terminates, either because
    /// its interrupt fired or because of an internal fault.
    fn start(self) -> impl Future<Output = Result<(), ServerError>> + Send;
}

/// Builds a [`Server`] from a fully assembled option set.
pub trait ServerFactory {
    type Server: Server;

    fn build(&self, options: ServerOptions) -> Result<Self::Server, ServerError>;
}
