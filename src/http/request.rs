//! Request ID assignment.
//!
//! # Responsibilities
//! - Reuse the client's `X-Request-ID` or generate a UUID v4
//! - Expose the ID to legacy handlers as a user value
//! - Echo the ID on the response
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Legacy handlers read it through their `Context`, never from a global

use std::fmt;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::host::UserValueExt;
use crate::legacy::LegacyRequest;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// User value key the request ID is stored under.
pub const REQUEST_ID_KEY: &str = "request_id";

/// Correlation ID for one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the request ID a legacy handler was given.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl RequestIdExt for LegacyRequest {
    fn request_id(&self) -> Option<&RequestId> {
        self.context().value::<RequestId>(REQUEST_ID_KEY)
    }
}

/// Axum middleware assigning a request ID.
pub async fn request_id_middleware(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| RequestId(v.to_string()))
        .unwrap_or_default();

    tracing::debug!(request_id = %id, path = %req.uri().path(), "Assigned request ID");
    req.set_user_value(REQUEST_ID_KEY, id.clone());

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|req: Request<Body>| async move {
                    req.user_value::<RequestId>(REQUEST_ID_KEY)
                        .map(|id| id.to_string())
                        .unwrap_or_default()
                }),
            )
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[tokio::test]
    async fn test_reuses_client_id() {
        let req = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "client-supplied")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "client-supplied");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"client-supplied");
    }

    #[tokio::test]
    async fn test_generates_missing_id() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();

        let header = response
            .headers()
            .get(X_REQUEST_ID)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(header.as_bytes(), &body[..]);
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
