//! The legacy handler interface.
//!
//! # Data Flow
//! ```text
//! LegacyRequest (method, headers, url, body reader, context)
//!     → LegacyHandler::serve
//!     → ResponseWriter (header map, status, byte writes)
//! ```
//!
//! Handlers written against this interface are synchronous and write-based.
//! The `adapter` module runs them on the axum host.

pub mod body;
pub mod context;
pub mod handler;
pub mod request;
pub mod response;
pub mod url;

pub use body::BufferedBody;
pub use context::{Context, ContextValue};
pub use handler::LegacyHandler;
pub use request::LegacyRequest;
pub use response::{CapturedResponse, ResponseWriter};
pub use url::{parse_request_uri, RequestUrl, UrlError};
