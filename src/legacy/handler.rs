//! The legacy handler contract.

use std::sync::Arc;

use crate::legacy::request::LegacyRequest;
use crate::legacy::response::ResponseWriter;

/// A handler written against the legacy request/response-writer interface.
///
/// Handlers return nothing. Everything they want the client to see goes
/// through the writer, any number of times, before `serve` returns.
pub trait LegacyHandler: Send + Sync {
    fn serve(&self, w: &mut dyn ResponseWriter, r: &mut LegacyRequest);
}

impl<F> LegacyHandler for F
where
    F: Fn(&mut dyn ResponseWriter, &mut LegacyRequest) + Send + Sync,
{
    fn serve(&self, w: &mut dyn ResponseWriter, r: &mut LegacyRequest) {
        (self)(w, r)
    }
}

impl<H: LegacyHandler + ?Sized> LegacyHandler for Arc<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, r: &mut LegacyRequest) {
        self.as_ref().serve(w, r)
    }
}
