//! Adapter error definitions.

use thiserror::Error;

use crate::legacy::UrlError;

/// Errors surfaced by the adapter.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// The request-target is not a valid request URI.
    ///
    /// A 500 response has already been written to the transaction.
    #[error("cannot parse request URI {target:?}: {source}")]
    MalformedTarget {
        target: String,
        #[source]
        source: UrlError,
    },
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
