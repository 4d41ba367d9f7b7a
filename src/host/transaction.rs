//! The per-request transaction exposed by the host server.
//!
//! # Responsibilities
//! - Hold the buffered inbound request (method, target, headers, body, peer)
//! - Carry the request's user values
//! - Accumulate the outbound response (status, headers, body)
//!
//! # Design Decisions
//! - The request-target is kept as raw text; parsing is left to the consumer
//! - Response headers append, so several values per name survive
//! - `error` replaces the body wholesale with a plain-text message

use std::any::Any;
use std::net::{Ipv4Addr, SocketAddr};

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, HOST},
        request::Parts,
        HeaderMap, HeaderValue, Method, Response, StatusCode, Uri, Version,
    },
};
use bytes::Bytes;

use crate::host::user_values::UserValues;

/// Peer address reported when the connection address is unknown.
pub const UNKNOWN_REMOTE_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    0,
);

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// One inbound request and the response being built for it.
#[derive(Debug)]
pub struct Transaction {
    method: Method,
    request_uri: String,
    version: Version,
    request_headers: HeaderMap,
    remote_addr: SocketAddr,
    body: Bytes,
    user_values: UserValues,

    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Vec<u8>,
}

impl Transaction {
    /// A transaction with no headers, an empty body and an unknown peer.
    pub fn new(method: Method, request_uri: impl Into<String>) -> Self {
        Self {
            method,
            request_uri: request_uri.into(),
            version: Version::HTTP_11,
            request_headers: HeaderMap::new(),
            remote_addr: UNKNOWN_REMOTE_ADDR,
            body: Bytes::new(),
            user_values: UserValues::default(),
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: Vec::new(),
        }
    }

    /// Build from the head of an axum request and its buffered body.
    ///
    /// User values stored in the request extensions move into the transaction.
    pub fn from_parts(mut parts: Parts, body: Bytes, remote_addr: SocketAddr) -> Self {
        let user_values = parts.extensions.remove::<UserValues>().unwrap_or_default();
        Self {
            method: parts.method,
            request_uri: parts.uri.to_string(),
            version: parts.version,
            request_headers: parts.headers,
            remote_addr,
            body,
            user_values,
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: Vec::new(),
        }
    }

    // Request side

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request-target as received.
    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    pub fn set_request_uri(&mut self, request_uri: impl Into<String>) -> &mut Self {
        self.request_uri = request_uri.into();
        self
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    pub fn request_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.request_headers
    }

    /// The `Host` header, else the authority of the request-target, else empty.
    pub fn host(&self) -> String {
        if let Some(host) = self.request_headers.get(HOST).and_then(|v| v.to_str().ok()) {
            return host.to_string();
        }
        self.request_uri
            .parse::<Uri>()
            .ok()
            .and_then(|uri| uri.authority().map(|a| a.to_string()))
            .unwrap_or_default()
    }

    pub fn set_host(&mut self, host: HeaderValue) -> &mut Self {
        self.request_headers.insert(HOST, host);
        self
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn set_remote_addr(&mut self, addr: SocketAddr) -> &mut Self {
        self.remote_addr = addr;
        self
    }

    /// The fully buffered request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.body = body.into();
        self
    }

    pub fn user_values(&self) -> &UserValues {
        &self.user_values
    }

    pub fn set_user_value<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.user_values.set(key, value);
    }

    pub fn user_value<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.user_values.get(key)
    }

    // Response side

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response_headers
    }

    /// Append bytes to the response body.
    pub fn write(&mut self, data: &[u8]) {
        self.response_body.extend_from_slice(data);
    }

    pub fn response_body(&self) -> &[u8] {
        &self.response_body
    }

    /// Replace the response with a plain-text error.
    pub fn error(&mut self, message: &str, status: StatusCode) {
        self.status = status;
        self.response_headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(PLAIN_TEXT));
        self.response_body.clear();
        self.response_body.extend_from_slice(message.as_bytes());
    }

    /// Finish the transaction as an axum response.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.response_body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.response_headers;
        response
    }
}
