//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! adapter, service, server
//!     → tracing events (diagnostics, request spans via TraceLayer)
//!     → logging.rs subscriber (stdout, text or JSON)
//! ```

pub mod logging;
