//! Demo legacy handlers served by the bridge binary.
//!
//! Both are written purely against the legacy interface; nothing here
//! knows about axum.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use serde_json::json;
use url::form_urlencoded;

use crate::http::request::RequestIdExt;
use crate::legacy::{LegacyRequest, ResponseWriter};

/// Plain-text greeting.
pub fn hello(w: &mut dyn ResponseWriter, r: &mut LegacyRequest) {
    w.header_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    let who = r
        .url
        .query()
        .and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "name")
                .map(|(_, name)| name.into_owned())
        })
        .filter(|name| !name.is_empty());
    let _ = writeln!(w, "Hello, {}!", who.as_deref().unwrap_or("world"));
}

/// Describe the request as the legacy handler saw it, as JSON.
pub fn echo(w: &mut dyn ResponseWriter, r: &mut LegacyRequest) {
    let mut body = Vec::new();
    if let Err(e) = r.body.read_to_end(&mut body) {
        tracing::warn!(error = %e, "Failed to read request body");
        w.write_header(StatusCode::BAD_REQUEST);
        return;
    }
    r.body.close();

    let mut headers: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (name, value) in r.headers.iter() {
        headers
            .entry(name.as_str())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    let description = json!({
        "method": r.method.as_str(),
        "proto": r.proto(),
        "request_uri": r.request_uri,
        "path": r.url.path(),
        "query": r.url.query(),
        "host": r.host,
        "remote_addr": r.remote_addr,
        "content_length": r.content_length,
        "transfer_encoding": r.transfer_encoding,
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
        "request_id": r.request_id().map(|id| id.as_str()),
    });

    match serde_json::to_vec(&description) {
        Ok(bytes) => {
            w.header_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            let _ = w.write_all(&bytes);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode echo response");
            w.write_header(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
