//! Buffered request body handed to legacy handlers.

use std::io::{self, Read};

use bytes::{Buf, Bytes};

/// Forward-only reader over a fully buffered request body.
///
/// Reading drains the buffer. Once drained, `read` returns `Ok(0)`.
#[derive(Debug, Default, Clone)]
pub struct BufferedBody {
    buf: Bytes,
}

impl BufferedBody {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    /// Number of bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Discard any unread bytes. Never fails and may be called repeatedly.
    pub fn close(&mut self) {
        self.buf.clear();
    }
}

impl Read for BufferedBody {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = out.len().min(self.buf.len());
        out[..n].copy_from_slice(&self.buf[..n]);
        self.buf.advance(n);
        Ok(n)
    }
}
