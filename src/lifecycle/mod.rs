//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse pragmas → Arm interrupt bridge → Assemble options
//!         → Resolve cluster id → Construct server → Start (blocks)
//!
//! Interrupt (interrupt.rs + signals.rs):
//!     Cancellation token, else SIGINT/SIGTERM → one value into the
//!     server's interrupt channel
//!
//! Shutdown (shutdown.rs):
//!     Interrupt received by server → broadcast to listeners → drain → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: pragma, construction and start errors are fatal
//! - The interrupt bridge is armed before construction
//! - Cluster identity problems only degrade, never abort

pub mod interrupt;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use interrupt::{InterruptCause, InterruptReceiver};
pub use shutdown::Shutdown;
pub use signals::SignalKind;
pub use startup::{assemble_options, Bootstrap, BootstrapError, Phase};
