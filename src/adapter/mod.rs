//! Runs legacy handlers on the axum host.
//!
//! # Data Flow
//! ```text
//! Transaction (host)
//!     → field copy → LegacyRequest
//!     → LegacyHandler::serve(CapturedResponse, LegacyRequest)
//!     → replay status/headers/body → Transaction
//! ```
//!
//! # Design Decisions
//! - Every request is transcoded, so an adapted handler is always slower
//!   than a native axum one. Use this to migrate, then rewrite.
//! - The legacy request always reports HTTP/1.1, whatever was negotiated
//! - Handler output is captured and replayed in one step after `serve` returns
//! - A malformed request-target is the only failure; it yields a 500

pub mod error;
pub mod service;

use std::sync::Arc;

use axum::http::{header::TRANSFER_ENCODING, HeaderMap, StatusCode};

use crate::host::Transaction;
use crate::legacy::{
    parse_request_uri, BufferedBody, CapturedResponse, LegacyHandler, LegacyRequest,
    ResponseWriter,
};

pub use error::{AdapterError, AdapterResult};
pub use service::LegacyService;

/// Wraps a legacy handler so it can serve host transactions.
pub struct LegacyAdapter<H> {
    handler: Arc<H>,
}

impl<H> Clone for LegacyAdapter<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H: LegacyHandler> LegacyAdapter<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Translate the transaction, invoke the handler, and write its response
    /// back onto the transaction.
    pub fn call(&self, txn: &mut Transaction) -> AdapterResult<()> {
        translate(self.handler.as_ref(), txn)
    }

    /// A tower service suitable for `Router::route_service`.
    pub fn into_service(self) -> LegacyService<H> {
        LegacyService::new(self)
    }
}

impl<F> LegacyAdapter<F>
where
    F: Fn(&mut dyn ResponseWriter, &mut LegacyRequest) + Send + Sync,
{
    /// Wrap a plain handler function.
    pub fn from_fn(f: F) -> Self {
        Self::new(f)
    }
}

/// Run `handler` against `txn`.
///
/// On a malformed request-target the transaction receives a plain-text 500
/// and the handler is not called.
pub fn translate<H>(handler: &H, txn: &mut Transaction) -> AdapterResult<()>
where
    H: LegacyHandler + ?Sized,
{
    let body = txn.body().clone();
    let request_uri = txn.request_uri().to_string();

    let mut headers = HeaderMap::with_capacity(txn.request_headers().keys_len());
    let mut transfer_encoding = Vec::new();
    for (name, value) in txn.request_headers() {
        if *name == TRANSFER_ENCODING {
            transfer_encoding.push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        } else {
            headers.insert(name.clone(), value.clone());
        }
    }

    let url = match parse_request_uri(&request_uri) {
        Ok(url) => url,
        Err(source) => {
            tracing::error!(
                request_uri = ?request_uri,
                error = %source,
                "cannot parse request URI"
            );
            txn.error("Internal Server Error", StatusCode::INTERNAL_SERVER_ERROR);
            return Err(AdapterError::MalformedTarget {
                target: request_uri,
                source,
            });
        }
    };

    let mut req = LegacyRequest::from_parsed(txn.method().clone(), request_uri, url)
        .with_context(txn.user_values().to_context());
    req.content_length = body.len() as u64;
    req.transfer_encoding = transfer_encoding;
    req.host = txn.host();
    req.remote_addr = txn.remote_addr().to_string();
    req.headers = headers;
    req.body = BufferedBody::new(body);

    let mut w = CapturedResponse::new();
    handler.serve(&mut w, &mut req);

    let (status, headers, body) = w.into_parts();
    txn.set_status(status);
    let out = txn.response_headers_mut();
    for (name, value) in headers.iter() {
        out.append(name.clone(), value.clone());
    }
    txn.write(&body);

    Ok(())
}
