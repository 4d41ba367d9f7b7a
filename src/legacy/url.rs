//! Request-target parsing for legacy requests.
//!
//! # Responsibilities
//! - Parse the raw request-target into a `RequestUrl`
//! - Reject targets a legacy handler could not route on
//!
//! # Design Decisions
//! - Accepted forms: `*`, origin-form (`/path?query`), absolute-form
//!   (`scheme://authority/path?query`)
//! - The path is never normalised; dot segments reach the handler as sent
//! - Origin-form never parses an authority, so `//a/b` is a path
//! - A `#` stays part of the path or query; request targets carry no fragment
//! - Only the path is percent-decoded; the query is kept raw

use std::fmt;

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Reasons a request-target is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("empty url")]
    Empty,

    #[error("invalid control character in URL")]
    ControlCharacter,

    /// Neither `*`, an absolute path, nor an absolute URI with a path.
    #[error("invalid URI for request")]
    NotRequestUri,

    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),
}

/// A parsed request-target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    raw_path: String,
    raw_query: Option<String>,
}

impl RequestUrl {
    /// Scheme of an absolute-form target, lowercased.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// `host[:port]` of an absolute-form target.
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Percent-decoded path.
    ///
    /// Escapes that do not decode to valid UTF-8 are replaced with U+FFFD;
    /// use `raw_path` when the exact bytes matter.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path exactly as it appeared on the wire.
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    /// The origin-form of this URL: encoded path plus query.
    pub fn request_uri(&self) -> String {
        match &self.raw_query {
            Some(q) => format!("{}?{}", self.raw_path, q),
            None => self.raw_path.clone(),
        }
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}://{}", scheme, self.authority.as_deref().unwrap_or(""))?;
        }
        write!(f, "{}", self.request_uri())
    }
}

/// Parse a raw request-target.
pub fn parse_request_uri(raw: &str) -> Result<RequestUrl, UrlError> {
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }
    if raw.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return Err(UrlError::ControlCharacter);
    }

    if raw == "*" {
        return Ok(RequestUrl {
            scheme: None,
            authority: None,
            path: "*".to_string(),
            raw_path: "*".to_string(),
            raw_query: None,
        });
    }

    if raw.starts_with('/') {
        return path_and_query(None, None, raw);
    }

    match split_scheme(raw) {
        Some((scheme, rest)) => parse_absolute(scheme, rest),
        None => Err(UrlError::NotRequestUri),
    }
}

/// `rest` is everything after `scheme:`; it must be `//authority[/path]` or `/path`.
fn parse_absolute(scheme: &str, rest: &str) -> Result<RequestUrl, UrlError> {
    let scheme = Some(scheme.to_ascii_lowercase());

    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(['/', '?']).unwrap_or(after.len());
        let (authority, tail) = after.split_at(end);
        return path_and_query(scheme, Some(authority.to_string()), tail);
    }

    if rest.starts_with('/') {
        return path_and_query(scheme, None, rest);
    }

    Err(UrlError::NotRequestUri)
}

fn path_and_query(
    scheme: Option<String>,
    authority: Option<String>,
    target: &str,
) -> Result<RequestUrl, UrlError> {
    let (raw_path, raw_query) = match target.split_once('?') {
        Some((p, q)) => (p, Some(q.to_string())),
        None => (target, None),
    };
    Ok(RequestUrl {
        scheme,
        authority,
        path: decode_path(raw_path)?,
        raw_path: raw_path.to_string(),
        raw_query,
    })
}

/// Split `scheme ":" rest` where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn split_scheme(raw: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = raw.split_once(':')?;
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some((scheme, rest))
}

fn decode_path(raw: &str) -> Result<String, UrlError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            match escape {
                Some([a, b]) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit() => i += 3,
                _ => {
                    let end = (i + 3).min(raw.len());
                    return Err(UrlError::InvalidEscape(
                        String::from_utf8_lossy(&bytes[i..end]).into_owned(),
                    ));
                }
            }
        } else {
            i += 1;
        }
    }
    Ok(percent_decode_str(raw).decode_utf8_lossy().into_owned())
}
