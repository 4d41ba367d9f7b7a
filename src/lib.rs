//! Run handlers written against a synchronous request/response-writer
//! interface on an Axum server.
//!
//! Every request is transcoded between two in-memory representations, so an
//! adapted handler is slower than a native one. The adapter exists to let a
//! codebase move to Axum first and rewrite its handlers afterwards.
//!
//! ```no_run
//! use std::io::Write;
//! use axum::Router;
//! use legacy_bridge::adapter::LegacyAdapter;
//! use legacy_bridge::legacy::{LegacyRequest, ResponseWriter};
//!
//! fn status(w: &mut dyn ResponseWriter, r: &mut LegacyRequest) {
//!     let _ = write!(w, "{} {}", r.method, r.url.path());
//! }
//!
//! let app: Router = Router::new()
//!     .route_service("/status", LegacyAdapter::from_fn(status).into_service());
//! ```

pub mod adapter;
pub mod config;
pub mod host;
pub mod http;
pub mod legacy;
pub mod lifecycle;
pub mod observability;

pub use adapter::{translate, AdapterError, LegacyAdapter, LegacyService};
pub use config::BridgeConfig;
pub use host::Transaction;
pub use http::BridgeServer;
pub use legacy::{LegacyHandler, LegacyRequest, ResponseWriter};
pub use lifecycle::Shutdown;
