//! HTTP serving for adapted legacy handlers.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, TraceLayer, timeout)
//!     → request.rs (request ID → user value)
//!     → adapter::LegacyService (buffer, translate, run handler, replay)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{RequestId, RequestIdExt, REQUEST_ID_KEY, X_REQUEST_ID};
pub use server::{demo_routes, BridgeServer};
