//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast to subscribers → server stops accepting → drain
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → same path as trigger()
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
