//! The host side: how the axum server presents one request to the adapter.
//!
//! # Data Flow
//! ```text
//! axum Request<Body>
//!     → body buffered, ConnectInfo read
//!     → Transaction (request fields + user values)
//!     → [adapter writes status/headers/body]
//!     → Transaction::into_response
//! ```

pub mod transaction;
pub mod user_values;

pub use transaction::{Transaction, UNKNOWN_REMOTE_ADDR};
pub use user_values::{UserValueExt, UserValues};
