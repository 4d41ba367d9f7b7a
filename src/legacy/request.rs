//! The request object legacy handlers receive.

use axum::http::{HeaderMap, Method, Version};

use crate::legacy::body::BufferedBody;
use crate::legacy::context::Context;
use crate::legacy::url::{parse_request_uri, RequestUrl, UrlError};

/// A fully buffered HTTP request in the shape legacy handlers expect.
///
/// `Transfer-Encoding` is modelled separately from the other headers and
/// never appears in `headers`.
#[derive(Debug)]
pub struct LegacyRequest {
    pub method: Method,
    pub version: Version,
    /// Request-target exactly as received.
    pub request_uri: String,
    pub url: RequestUrl,
    pub content_length: u64,
    pub transfer_encoding: Vec<String>,
    pub host: String,
    /// Peer address as `ip:port`.
    pub remote_addr: String,
    pub headers: HeaderMap,
    pub body: BufferedBody,
    context: Context,
}

impl LegacyRequest {
    /// An HTTP/1.1 request with no headers and an empty body.
    pub fn new(method: Method, request_uri: impl Into<String>) -> Result<Self, UrlError> {
        let request_uri = request_uri.into();
        let url = parse_request_uri(&request_uri)?;
        Ok(Self::from_parsed(method, request_uri, url))
    }

    pub(crate) fn from_parsed(method: Method, request_uri: String, url: RequestUrl) -> Self {
        Self {
            method,
            version: Version::HTTP_11,
            request_uri,
            url,
            content_length: 0,
            transfer_encoding: Vec::new(),
            host: String::new(),
            remote_addr: String::new(),
            headers: HeaderMap::new(),
            body: BufferedBody::default(),
            context: Context::default(),
        }
    }

    /// Protocol string, e.g. `HTTP/1.1`.
    pub fn proto(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "HTTP/0.9",
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_2 => "HTTP/2.0",
            Version::HTTP_3 => "HTTP/3.0",
            _ => "HTTP/1.1",
        }
    }

    pub fn proto_major(&self) -> u8 {
        match self.version {
            Version::HTTP_09 => 0,
            Version::HTTP_2 => 2,
            Version::HTTP_3 => 3,
            _ => 1,
        }
    }

    pub fn proto_minor(&self) -> u8 {
        match self.version {
            Version::HTTP_09 => 9,
            Version::HTTP_10 | Version::HTTP_2 | Version::HTTP_3 => 0,
            _ => 1,
        }
    }

    /// First value of a header as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Replace the request context.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
}
