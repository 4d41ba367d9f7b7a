//! Response writing for legacy handlers.
//!
//! # Responsibilities
//! - Define the write-based `ResponseWriter` contract handlers are written against
//! - Capture everything a handler writes so it can be replayed onto the host response
//!
//! # Design Decisions
//! - Nothing is committed while the handler runs; `CapturedResponse` only records
//! - Status defaults to 200 when the handler never sets one
//! - The header map is allocated on first access

use std::io::{self, Write};

use axum::http::{HeaderMap, StatusCode};

/// The response side of a legacy handler.
///
/// Body bytes are written through `std::io::Write`. Multiple writes
/// accumulate in call order.
pub trait ResponseWriter: Write {
    /// Mutable access to the response headers.
    fn header_mut(&mut self) -> &mut HeaderMap;

    /// Set the response status. The last call wins.
    fn write_header(&mut self, status: StatusCode);
}

/// In-memory record of a legacy handler's response.
#[derive(Debug, Default)]
pub struct CapturedResponse {
    status: Option<StatusCode>,
    headers: Option<HeaderMap>,
    body: Vec<u8>,
}

impl CapturedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status the handler set, or 200.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Headers written so far, if the handler touched them at all.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Split into status, headers and body for replay.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Vec<u8>) {
        let status = self.status();
        (status, self.headers.unwrap_or_default(), self.body)
    }
}

impl ResponseWriter for CapturedResponse {
    fn header_mut(&mut self) -> &mut HeaderMap {
        self.headers.get_or_insert_with(HeaderMap::new)
    }

    fn write_header(&mut self, status: StatusCode) {
        self.status = Some(status);
    }
}

impl Write for CapturedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
